use crate::core::billing::calendarize;
use crate::core::climate::Climate;
use crate::core::comparison::{compare_bills, BillComparison, Payback};
use crate::core::heat_balance::{HeatBalance, HeatTransferBreakdown, DEFAULT_VENTILATION_FACTOR};
use crate::core::simulation::{simulate_annual_usage, MonthlyUsageSnapshot};
use crate::core::solar::{SolarCoefficients, SolarGeometry};
use crate::errors::ModelError;
use crate::input::{EnvelopeComponent, ModelDataSet, UtilityBill};

/// A fully evaluated home energy model. The annual simulation and the bill
/// calendarization run once, at construction, and the results are frozen
/// alongside the validated inputs they came from.
#[derive(Debug)]
pub struct HomeEnergyModel {
    climate: Climate,
    envelope: Vec<EnvelopeComponent>,
    solar_coefficients: SolarCoefficients,
    solar_geometry: SolarGeometry,
    ventilation_factor: f64,
    actual_gas_bills: Vec<UtilityBill>,
    actual_cooling_bills: Vec<UtilityBill>,
    monthly_gas_usage: Vec<MonthlyUsageSnapshot>,
    monthly_cooling_usage: Vec<MonthlyUsageSnapshot>,
    modelled_gas_bills: Vec<UtilityBill>,
    modelled_cooling_bills: Vec<UtilityBill>,
}

impl HomeEnergyModel {
    /// Build and evaluate a model from a parsed data set. `ventilation_factor`
    /// overrides the default whole-dwelling factor; pass `None` for the
    /// as-built dwelling.
    pub fn new(data: ModelDataSet, ventilation_factor: Option<f64>) -> Result<Self, ModelError> {
        let ModelDataSet {
            climate,
            components,
            solar_coefficients,
            solar_geometry,
            gas_bills,
            cooling_bills,
        } = data;
        let climate = Climate::new(climate)?;
        let solar_coefficients = SolarCoefficients::new(&solar_coefficients)?;
        let solar_geometry = SolarGeometry::new(&solar_geometry)?;
        let ventilation_factor = ventilation_factor.unwrap_or(DEFAULT_VENTILATION_FACTOR);

        let balance = HeatBalance::new(
            &climate,
            &components,
            &solar_coefficients,
            &solar_geometry,
            ventilation_factor,
        );
        let usage = simulate_annual_usage(&balance)?;
        let modelled_gas_bills = calendarize(&gas_bills, &usage.gas)?;
        let modelled_cooling_bills = calendarize(&cooling_bills, &usage.cooling)?;

        Ok(Self {
            climate,
            envelope: components,
            solar_coefficients,
            solar_geometry,
            ventilation_factor,
            actual_gas_bills: gas_bills,
            actual_cooling_bills: cooling_bills,
            monthly_gas_usage: usage.gas,
            monthly_cooling_usage: usage.cooling,
            modelled_gas_bills,
            modelled_cooling_bills,
        })
    }

    pub fn ventilation_factor(&self) -> f64 {
        self.ventilation_factor
    }

    pub fn monthly_gas_usage(&self) -> &[MonthlyUsageSnapshot] {
        &self.monthly_gas_usage
    }

    pub fn monthly_cooling_usage(&self) -> &[MonthlyUsageSnapshot] {
        &self.monthly_cooling_usage
    }

    pub fn modelled_gas_bills(&self) -> &[UtilityBill] {
        &self.modelled_gas_bills
    }

    pub fn modelled_cooling_bills(&self) -> &[UtilityBill] {
        &self.modelled_cooling_bills
    }

    /// Conduction/ventilation/solar decomposition of every month's transfer,
    /// for reporting.
    pub fn heat_transfer_breakdown(&self) -> Result<HeatTransferBreakdown, ModelError> {
        self.heat_balance().breakdown()
    }

    /// How closely the model reproduces the actual bills it was given, per
    /// service. Actual bills are the first series, so positive changes mean
    /// the model under-predicts.
    pub fn accuracy(&self) -> Result<ModelAccuracy, ModelError> {
        Ok(ModelAccuracy {
            gas: compare_bills(&self.actual_gas_bills, &self.modelled_gas_bills)?,
            cooling: compare_bills(&self.actual_cooling_bills, &self.modelled_cooling_bills)?,
        })
    }

    /// Compare this model's modelled bills against an improved variant's, per
    /// service. This model is the first series, so positive changes are
    /// reductions delivered by the improvement.
    pub fn compare_with(
        &self,
        improved: &HomeEnergyModel,
    ) -> Result<ScenarioComparison, ModelError> {
        Ok(ScenarioComparison {
            gas: compare_bills(&self.modelled_gas_bills, &improved.modelled_gas_bills)?,
            cooling: compare_bills(&self.modelled_cooling_bills, &improved.modelled_cooling_bills)?,
        })
    }

    fn heat_balance(&self) -> HeatBalance<'_> {
        HeatBalance::new(
            &self.climate,
            &self.envelope,
            &self.solar_coefficients,
            &self.solar_geometry,
            self.ventilation_factor,
        )
    }
}

/// Actual-vs-modelled bill comparison for both services.
#[derive(Clone, Debug)]
pub struct ModelAccuracy {
    pub gas: BillComparison,
    pub cooling: BillComparison,
}

/// Base-vs-improved bill comparison for both services.
#[derive(Clone, Debug)]
pub struct ScenarioComparison {
    pub gas: BillComparison,
    pub cooling: BillComparison,
}

impl ScenarioComparison {
    /// Yearly cost saving the improvement delivers across both services.
    pub fn yearly_savings(&self) -> f64 {
        let base = self.gas.totals.first_cost + self.cooling.totals.first_cost;
        let improved = self.gas.totals.second_cost + self.cooling.totals.second_cost;
        base - improved
    }

    pub fn payback(&self, capital_cost: f64) -> Payback {
        Payback::assess(capital_cost, self.yearly_savings())
    }
}
