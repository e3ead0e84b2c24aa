pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod report;

pub use crate::core::model::HomeEnergyModel;
pub use crate::errors::AuditError;
use crate::input::{load_data_set, load_improvement_data_set, AuditProject};
use crate::output::Output;
use crate::report::{
    write_bill_comparison_report, write_heat_transfer_breakdown, write_input_echo,
    write_monthly_usage, ACTUAL_VS_MODELLED, BASE_VS_IMPROVED,
};
use convert_case::{Case, Casing};
use std::path::Path;
use tracing::info;

/// Run a whole audit: load the tables the project names, evaluate the
/// as-built model, write its usage, breakdown and accuracy reports, then
/// evaluate each improvement scenario against it with a payback verdict.
pub fn run_audit(
    project: &AuditProject,
    base_dir: &Path,
    output: &impl Output,
    echo_input: bool,
) -> Result<(), AuditError> {
    let data = load_data_set(base_dir, project)?;
    if echo_input && !output.is_noop() {
        write_input_echo(output, "input_echo", &data).map_err(AuditError::FailureInReporting)?;
    }

    info!("evaluating the as-built model");
    let base = HomeEnergyModel::new(data.clone(), None)?;

    write_monthly_usage(
        output,
        "modelled_gas_usage",
        "Gas Usage (kWh)",
        base.monthly_gas_usage(),
    )
    .map_err(AuditError::FailureInReporting)?;
    write_monthly_usage(
        output,
        "modelled_cooling_electricity_usage",
        "Cooling Electricity Usage (kWh)",
        base.monthly_cooling_usage(),
    )
    .map_err(AuditError::FailureInReporting)?;
    write_heat_transfer_breakdown(
        output,
        "heat_transfer_breakdown",
        &base.heat_transfer_breakdown()?,
    )
    .map_err(AuditError::FailureInReporting)?;

    let accuracy = base.accuracy()?;
    write_bill_comparison_report(
        output,
        "model_accuracy",
        &accuracy.gas,
        &accuracy.cooling,
        &ACTUAL_VS_MODELLED,
        None,
    )
    .map_err(AuditError::FailureInReporting)?;

    for improvement in &project.improvements {
        info!("evaluating improvement scenario {:?}", improvement.name);
        let improved_data = load_improvement_data_set(base_dir, improvement, &data)?;
        let improved = HomeEnergyModel::new(improved_data, improvement.ventilation_factor)?;
        let comparison = base.compare_with(&improved)?;
        let payback = comparison.payback(improvement.capital_cost);
        info!("{payback}");
        let location_key = format!("improvement_{}", improvement.name.to_case(Case::Snake));
        write_bill_comparison_report(
            output,
            &location_key,
            &comparison.gas,
            &comparison.cooling,
            &BASE_VS_IMPROVED,
            Some(&payback.to_string()),
        )
        .map_err(AuditError::FailureInReporting)?;
    }

    Ok(())
}
