pub mod billing;
pub mod climate;
pub mod comparison;
pub mod envelope;
pub mod heat_balance;
pub mod model;
pub mod simulation;
pub mod solar;
pub mod units;
