use crate::core::simulation::MonthlyUsageSnapshot;
use crate::core::units::MONTHS_PER_YEAR;
use crate::errors::ModelError;
use crate::input::UtilityBill;
use tracing::warn;

/// Restate the 12 modelled monthly snapshots over the periods of a series of
/// actual bills: half of the start month's usage plus half of the end
/// month's, priced at the actual bill's rate.
///
/// The half-and-half split assumes meter reads fall near mid-month, so each
/// bill straddles exactly one month boundary. Bills spanning any other run of
/// months are still split that way but flagged, since the result ignores the
/// true period length. Bill positions in diagnostics are 1-based.
pub fn calendarize(
    actual_bills: &[UtilityBill],
    usage: &[MonthlyUsageSnapshot],
) -> Result<Vec<UtilityBill>, ModelError> {
    if usage.len() != MONTHS_PER_YEAR as usize {
        return Err(ModelError::IncompleteUsage { count: usage.len() });
    }
    let mut modelled = Vec::with_capacity(actual_bills.len());
    for (position, bill) in actual_bills.iter().enumerate() {
        let index = position + 1;
        for month in [bill.start_month, bill.end_month] {
            if !(1..=MONTHS_PER_YEAR).contains(&month) {
                return Err(ModelError::BillMonthOutOfRange { index, month });
            }
        }
        if bill.end_month < bill.start_month {
            return Err(ModelError::BillWrapsYear {
                index,
                start: bill.start_month,
                end: bill.end_month,
            });
        }
        if bill.end_month - bill.start_month != 1 {
            warn!(
                "bill {index} spans months {}-{}, not two consecutive months; the half-and-half split will misstate its usage",
                bill.start_month, bill.end_month
            );
        }
        let usage_for = |month: u32| usage[(month - 1) as usize].usage / 2.;
        let modelled_usage = usage_for(bill.start_month) + usage_for(bill.end_month);
        modelled.push(UtilityBill {
            start_month: bill.start_month,
            end_month: bill.end_month,
            usage: modelled_usage,
            cost: bill.rate * modelled_usage,
            rate: bill.rate,
        });
    }
    Ok(modelled)
}
