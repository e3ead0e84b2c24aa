pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const HOURS_PER_DAY: u32 = 24;
pub const MONTHS_PER_YEAR: u32 = 12;
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Integrate a power figure in W over a month, given the number of hours per
/// day the power flows for, returning energy in kWh.
pub(crate) fn watts_to_monthly_kwh(power_watts: f64, hours_per_day: f64, days: u32) -> f64 {
    power_watts / WATTS_PER_KILOWATT as f64 * hours_per_day * days as f64
}
