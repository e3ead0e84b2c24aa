use crate::input::Orientation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit input was considered invalid due to error: {0}")]
    InvalidInput(#[from] anyhow::Error),
    #[error("Error identified during audit calculation: {0}")]
    FailureInCalculation(#[from] ModelError),
    #[error("Error writing audit report: {0}")]
    FailureInReporting(anyhow::Error),
}

/// Fatal conditions raised by the calculation core. Each variant carries the
/// month, orientation, angle bucket or bill position needed to diagnose the
/// offending input; none of them may be defaulted away.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("expected 12 monthly climate records, found {count}")]
    IncompleteClimate { count: usize },
    #[error("climate records do not cover months 1-12 exactly once (first gap or repeat at month {month})")]
    ClimateCoverage { month: u32 },
    #[error("month {month} is outside the calendar range 1-12")]
    MonthOutOfRange { month: u32 },
    #[error("no solar geometry entry for month {month} and orientation {orientation}")]
    MissingSolarGeometry { month: u32, orientation: Orientation },
    #[error("solar geometry lists month {month} and orientation {orientation} more than once")]
    DuplicateSolarGeometry { month: u32, orientation: Orientation },
    #[error("no solar heat gain coefficient for incidence angle {angle}°")]
    MissingSolarCoefficient { angle: i32 },
    #[error("no solar heat gain coefficient for the reserved diffuse bucket")]
    MissingDiffuseCoefficient,
    #[error("solar heat gain coefficients list angle {angle}° more than once")]
    DuplicateSolarCoefficient { angle: i32 },
    #[error("glazing component {name:?} has no orientation, so its solar gain cannot be resolved")]
    UnorientedGlazing { name: String },
    #[error("expected 12 monthly usage snapshots to calendarize, found {count}")]
    IncompleteUsage { count: usize },
    #[error("bill {index} references month {month}, which is outside the calendar range 1-12")]
    BillMonthOutOfRange { index: usize, month: u32 },
    #[error("bill {index} runs from month {start} to month {end}, which would wrap across a year boundary")]
    BillWrapsYear { index: usize, start: u32, end: u32 },
    #[error("cannot compare bill series of different lengths ({left} vs {right})")]
    MismatchedBillSeries { left: usize, right: usize },
}
