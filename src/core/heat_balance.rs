// Steady-state monthly heat balance for a dwelling. Three terms per month:
// fabric conduction and ventilation exchange, both driven by the
// indoor/outdoor temperature difference, and solar gain through glazing.

use crate::core::climate::Climate;
use crate::core::envelope;
use crate::core::solar::{SolarCoefficients, SolarGeometry};
use crate::core::units::{watts_to_monthly_kwh, HOURS_PER_DAY, MONTHS_PER_YEAR};
use crate::errors::ModelError;
use crate::input::EnvelopeComponent;

/// Indoor reference temperature in °C, held constant year-round.
pub const INDOOR_TEMP_CELSIUS: f64 = 21.1;
/// Default whole-dwelling ventilation heat transfer factor in W/K.
pub const DEFAULT_VENTILATION_FACTOR: f64 = 142.;
/// Temperature difference the ventilation factor is quoted at, in K.
pub const VENTILATION_REFERENCE_TEMP_DIFF: f64 = 21.1;

/// One dwelling's heat balance, borrowing the validated inputs it reads.
pub struct HeatBalance<'a> {
    climate: &'a Climate,
    envelope: &'a [EnvelopeComponent],
    coefficients: &'a SolarCoefficients,
    geometry: &'a SolarGeometry,
    ventilation_factor: f64,
}

impl<'a> HeatBalance<'a> {
    pub fn new(
        climate: &'a Climate,
        envelope: &'a [EnvelopeComponent],
        coefficients: &'a SolarCoefficients,
        geometry: &'a SolarGeometry,
        ventilation_factor: f64,
    ) -> Self {
        Self {
            climate,
            envelope,
            coefficients,
            geometry,
            ventilation_factor,
        }
    }

    /// Fabric conduction term ΣU·A in W/K.
    pub fn fabric_conductance(&self) -> f64 {
        envelope::fabric_conductance(self.envelope)
    }

    /// Ventilation term for the month in W/K: the configured factor scaled
    /// linearly by the month's indoor/outdoor temperature difference relative
    /// to the reference difference.
    pub fn ventilation_conductance(&self, month: u32) -> Result<f64, ModelError> {
        let record = self.climate.month(month)?;
        Ok(self.ventilation_factor * (INDOOR_TEMP_CELSIUS - record.air_temp).abs()
            / VENTILATION_REFERENCE_TEMP_DIFF)
    }

    /// Temperature-driven heat transfer for the month in kWh, negative for
    /// net loss and positive for net gain:
    /// Q = (ΣU·A + K_vent) × (T_out − T_in) × 24h × days
    pub fn temperature_driven_transfer(&self, month: u32) -> Result<f64, ModelError> {
        let record = self.climate.month(month)?;
        let conductance = self.fabric_conductance() + self.ventilation_conductance(month)?;
        let transfer_watts = conductance * (record.air_temp - INDOOR_TEMP_CELSIUS);
        Ok(watts_to_monthly_kwh(
            transfer_watts,
            HOURS_PER_DAY as f64,
            record.days,
        ))
    }

    /// Solar heat gain through glazing for the month in kWh. Beam flux is
    /// projected by the cosine of the incidence angle, weighted by the angle's
    /// gain coefficient and the face's beam exposure; diffuse flux is weighted
    /// by the reserved diffuse coefficient. The combined flux only acts over
    /// daylight hours.
    pub fn solar_heat_gain(&self, month: u32) -> Result<f64, ModelError> {
        let record = self.climate.month(month)?;
        let mut gain = 0.;
        for component in self.envelope.iter().filter(|c| c.is_glazing()) {
            let orientation = component
                .orientation
                .ok_or_else(|| ModelError::UnorientedGlazing {
                    name: component.name.clone(),
                })?;
            let incidence = self.geometry.incidence(month, orientation)?;
            let beam_flux = record.beam_flux
                * (incidence.angle as f64).to_radians().cos()
                * self.coefficients.at_angle(incidence.angle)?;
            let diffuse_flux = record.diffuse_flux * self.coefficients.diffuse()?;
            let flux = beam_flux * incidence.beam_exposure + diffuse_flux;
            gain += watts_to_monthly_kwh(flux * component.area, record.daylight_hours, record.days);
        }
        Ok(gain)
    }

    /// Decompose every month's transfer into conduction, ventilation and
    /// solar shares for reporting. The shares are recomputed from the same
    /// terms the transfer uses; they never feed back into the usage figures.
    pub fn breakdown(&self) -> Result<HeatTransferBreakdown, ModelError> {
        let fabric = self.fabric_conductance();
        let mut loss_months = Vec::new();
        let mut gain_months = Vec::new();
        for month in 1..=MONTHS_PER_YEAR {
            let record = self.climate.month(month)?;
            let per_kelvin_kwh = watts_to_monthly_kwh(
                record.air_temp - INDOOR_TEMP_CELSIUS,
                HOURS_PER_DAY as f64,
                record.days,
            );
            let conduction = (fabric * per_kelvin_kwh).abs();
            let ventilation = (self.ventilation_conductance(month)? * per_kelvin_kwh).abs();
            let solar = self.solar_heat_gain(month)?;
            if self.temperature_driven_transfer(month)? < 0. {
                let heat_loss = conduction + ventilation;
                loss_months.push(HeatLossShare {
                    month,
                    conduction_percent: percent_share(conduction, heat_loss),
                    ventilation_percent: percent_share(ventilation, heat_loss),
                    heat_loss,
                });
            } else {
                let heat_gain = conduction + ventilation + solar;
                gain_months.push(HeatGainShare {
                    month,
                    conduction_percent: percent_share(conduction, heat_gain),
                    ventilation_percent: percent_share(ventilation, heat_gain),
                    solar_percent: percent_share(solar, heat_gain),
                    heat_gain,
                });
            }
        }
        Ok(HeatTransferBreakdown {
            loss_months,
            gain_months,
        })
    }
}

/// Share of one month's heat loss carried by each temperature-driven term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatLossShare {
    pub month: u32,
    pub conduction_percent: f64,
    pub ventilation_percent: f64,
    pub heat_loss: f64,
}

/// Share of one month's heat gain carried by each term, solar included.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeatGainShare {
    pub month: u32,
    pub conduction_percent: f64,
    pub ventilation_percent: f64,
    pub solar_percent: f64,
    pub heat_gain: f64,
}

/// The year's months partitioned by the sign of their temperature-driven
/// transfer, each with its term shares.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatTransferBreakdown {
    pub loss_months: Vec<HeatLossShare>,
    pub gain_months: Vec<HeatGainShare>,
}

fn percent_share(part: f64, whole: f64) -> f64 {
    if whole > 0. {
        part / whole * 100.
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::DAYS_IN_MONTH;
    use crate::input::{
        ClimateRecord, ComponentKind, Orientation, SolarCoefficientRow, SolarGeometryRow,
    };
    use approx::assert_relative_eq;
    use rstest::*;

    const MONTHLY_TEMPS: [f64; 12] = [
        -5., -4., 0.8, 7.9, 14.1, 19.4, 22.3, 21.5, 17.2, 10.7, 4.4, -1.9,
    ];

    fn test_climate() -> Climate {
        Climate::new(
            (1..=12)
                .map(|month| ClimateRecord {
                    month,
                    days: DAYS_IN_MONTH[(month - 1) as usize],
                    air_temp: MONTHLY_TEMPS[(month - 1) as usize],
                    daylight_hours: 9.1,
                    beam_flux: 118.4,
                    diffuse_flux: 42.,
                })
                .collect(),
        )
        .unwrap()
    }

    fn opaque_only() -> Vec<EnvelopeComponent> {
        vec![EnvelopeComponent {
            name: "Walls and roof".into(),
            kind: ComponentKind::Opaque,
            orientation: None,
            area: 100.,
            u_value: 0.3,
        }]
    }

    fn with_south_glazing() -> Vec<EnvelopeComponent> {
        let mut components = opaque_only();
        components.push(EnvelopeComponent {
            name: "South windows".into(),
            kind: ComponentKind::Glazing,
            orientation: Some(Orientation::South),
            area: 12.5,
            u_value: 1.8,
        });
        components
    }

    fn coefficients() -> SolarCoefficients {
        SolarCoefficients::new(&[
            SolarCoefficientRow {
                angle: 30,
                coefficient: 0.52,
            },
            SolarCoefficientRow {
                angle: -1,
                coefficient: 0.45,
            },
        ])
        .unwrap()
    }

    fn south_all_year() -> SolarGeometry {
        SolarGeometry::new(&[SolarGeometryRow {
            months: (1..=12).collect(),
            orientation: Orientation::South,
            incidence_angle: 30,
            exposure_percent: 70.,
        }])
        .unwrap()
    }

    #[rstest]
    fn should_scale_ventilation_with_temperature_difference() {
        let climate = test_climate();
        let envelope = opaque_only();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        // January sits 26.1 K below the setpoint
        assert_relative_eq!(
            balance.ventilation_conductance(1).unwrap(),
            142. * 26.1 / 21.1,
            max_relative = 1e-12
        );
        // July sits 1.2 K above it; the scaling uses the magnitude
        assert_relative_eq!(
            balance.ventilation_conductance(7).unwrap(),
            142. * 1.2 / 21.1,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn should_compute_january_transfer_as_a_net_loss() {
        let climate = test_climate();
        let envelope = opaque_only();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 0.);
        // K = 30 W/K, 26.1 K deficit, 31 days
        assert_relative_eq!(
            balance.temperature_driven_transfer(1).unwrap(),
            -582.552,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn should_compute_july_transfer_as_a_net_gain() {
        let climate = test_climate();
        let envelope = opaque_only();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 0.);
        assert_relative_eq!(
            balance.temperature_driven_transfer(7).unwrap(),
            30. * (22.3 - 21.1) * 0.001 * 24. * 31.,
            max_relative = 1e-9
        );
    }

    #[rstest]
    fn should_combine_beam_and_diffuse_solar_gain() {
        let climate = test_climate();
        let envelope = with_south_glazing();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        let beam = 118.4 * 30f64.to_radians().cos() * 0.52;
        let flux = beam * 0.7 + 42. * 0.45;
        assert_relative_eq!(
            balance.solar_heat_gain(1).unwrap(),
            flux * 12.5 * 0.001 * 9.1 * 31.,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn solar_heat_gain_should_never_go_negative() {
        let climate = test_climate();
        let envelope = with_south_glazing();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        for month in 1..=12 {
            assert!(balance.solar_heat_gain(month).unwrap() >= 0.);
        }
    }

    #[rstest]
    fn opaque_components_should_contribute_no_solar_gain() {
        let climate = test_climate();
        let envelope = opaque_only();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        assert_eq!(balance.solar_heat_gain(1).unwrap(), 0.);
    }

    #[rstest]
    fn solar_gain_should_fail_for_unoriented_glazing() {
        let climate = test_climate();
        let mut envelope = with_south_glazing();
        envelope[1].orientation = None;
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        assert_eq!(
            balance.solar_heat_gain(1).err(),
            Some(ModelError::UnorientedGlazing {
                name: "South windows".into(),
            })
        );
    }

    #[rstest]
    fn solar_gain_should_fail_when_geometry_is_missing_for_a_month() {
        let climate = test_climate();
        let envelope = with_south_glazing();
        let coefficients = coefficients();
        let geometry = SolarGeometry::new(&[SolarGeometryRow {
            months: vec![1, 2],
            orientation: Orientation::South,
            incidence_angle: 30,
            exposure_percent: 70.,
        }])
        .unwrap();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        assert!(balance.solar_heat_gain(1).is_ok());
        assert_eq!(
            balance.solar_heat_gain(3).err(),
            Some(ModelError::MissingSolarGeometry {
                month: 3,
                orientation: Orientation::South,
            })
        );
    }

    #[rstest]
    fn breakdown_shares_should_sum_to_one_hundred_percent() {
        let climate = test_climate();
        let envelope = with_south_glazing();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        let breakdown = balance.breakdown().unwrap();
        assert_eq!(
            breakdown.loss_months.len() + breakdown.gain_months.len(),
            12
        );
        for share in &breakdown.loss_months {
            assert_relative_eq!(
                share.conduction_percent + share.ventilation_percent,
                100.,
                max_relative = 1e-9
            );
            assert!(share.heat_loss > 0.);
        }
        for share in &breakdown.gain_months {
            assert_relative_eq!(
                share.conduction_percent + share.ventilation_percent + share.solar_percent,
                100.,
                max_relative = 1e-9
            );
        }
    }

    #[rstest]
    fn breakdown_should_leave_zero_transfer_months_at_zero_shares() {
        let climate = Climate::new(
            (1..=12)
                .map(|month| ClimateRecord {
                    month,
                    days: DAYS_IN_MONTH[(month - 1) as usize],
                    air_temp: INDOOR_TEMP_CELSIUS,
                    daylight_hours: 9.1,
                    beam_flux: 118.4,
                    diffuse_flux: 42.,
                })
                .collect(),
        )
        .unwrap();
        let envelope = opaque_only();
        let coefficients = coefficients();
        let geometry = south_all_year();
        let balance = HeatBalance::new(&climate, &envelope, &coefficients, &geometry, 142.);
        let breakdown = balance.breakdown().unwrap();
        assert!(breakdown.loss_months.is_empty());
        for share in &breakdown.gain_months {
            assert_eq!(share.conduction_percent, 0.);
            assert_eq!(share.ventilation_percent, 0.);
            assert_eq!(share.solar_percent, 0.);
            assert_eq!(share.heat_gain, 0.);
        }
    }
}
