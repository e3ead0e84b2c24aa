use crate::core::heat_balance::HeatBalance;
use crate::core::units::MONTHS_PER_YEAR;
use crate::errors::ModelError;

/// Gas drawn every month regardless of weather (water heating, cooking), in
/// kWh. Roughly 25 therm.
pub const BASE_GAS_USAGE: f64 = 732.503;
/// Seasonal efficiency of the gas furnace.
pub const FURNACE_EFFICIENCY: f64 = 0.96;
/// Coefficient of performance of the electric cooling system.
pub const COOLING_COP: f64 = 4.27;

/// One month of modelled usage: the balance figures that produced it and the
/// resulting draw, all in kWh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlyUsageSnapshot {
    pub month: u32,
    pub heat_loss: f64,
    pub heat_gain: f64,
    pub usage: f64,
}

/// Twelve months of gas usage and of cooling electricity usage. The two
/// series carry the same heat loss and gain figures since the balance is
/// evaluated once per month.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnualUsage {
    pub gas: Vec<MonthlyUsageSnapshot>,
    pub cooling: Vec<MonthlyUsageSnapshot>,
}

/// Run the heat balance across the calendar year and settle each month as
/// either a heating month or a cooling month. A month with more loss than
/// gain burns gas to cover the shortfall at furnace efficiency on top of the
/// base load; otherwise the surplus is pumped out at the cooling COP.
pub fn simulate_annual_usage(balance: &HeatBalance) -> Result<AnnualUsage, ModelError> {
    let mut gas = Vec::with_capacity(MONTHS_PER_YEAR as usize);
    let mut cooling = Vec::with_capacity(MONTHS_PER_YEAR as usize);
    for month in 1..=MONTHS_PER_YEAR {
        let transfer = balance.temperature_driven_transfer(month)?;
        let solar_gain = balance.solar_heat_gain(month)?;

        let heat_loss = (-transfer).max(0.);
        let heat_gain = solar_gain + transfer.max(0.);

        let mut gas_usage = BASE_GAS_USAGE;
        let mut cooling_usage = 0.;
        if heat_loss > heat_gain {
            gas_usage += (heat_loss - heat_gain) / FURNACE_EFFICIENCY;
        } else {
            cooling_usage = (heat_gain - heat_loss) / COOLING_COP;
        }

        gas.push(MonthlyUsageSnapshot {
            month,
            heat_loss,
            heat_gain,
            usage: gas_usage,
        });
        cooling.push(MonthlyUsageSnapshot {
            month,
            heat_loss,
            heat_gain,
            usage: cooling_usage,
        });
    }
    Ok(AnnualUsage { gas, cooling })
}
