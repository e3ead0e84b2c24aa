use crate::errors::ModelError;
use crate::input::UtilityBill;
use itertools::izip;
use std::fmt;
use std::fmt::Display;

/// One billing period across the two series being compared. `None`
/// percentages mean the difference is not meaningful because usage on either
/// side of the period is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillComparisonRecord {
    pub start_month: u32,
    pub end_month: u32,
    pub first_usage: f64,
    pub second_usage: f64,
    pub first_cost: f64,
    pub second_cost: f64,
    pub usage_change_percent: Option<f64>,
    pub cost_change_percent: Option<f64>,
}

/// Sums over a whole compared series, with the percentage change of the sums
/// guarded the same way as the per-period records.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BillComparisonTotals {
    pub first_usage: f64,
    pub second_usage: f64,
    pub first_cost: f64,
    pub second_cost: f64,
    pub usage_change_percent: Option<f64>,
    pub cost_change_percent: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BillComparison {
    pub records: Vec<BillComparisonRecord>,
    pub totals: BillComparisonTotals,
}

/// Pair two bill series positionally and compute per-period usage and cost
/// changes relative to the first series, plus a totals summary. The series
/// must cover the same billing periods in the same order.
pub fn compare_bills(
    first: &[UtilityBill],
    second: &[UtilityBill],
) -> Result<BillComparison, ModelError> {
    if first.len() != second.len() {
        return Err(ModelError::MismatchedBillSeries {
            left: first.len(),
            right: second.len(),
        });
    }
    let mut records = Vec::with_capacity(first.len());
    let (mut usage_sums, mut cost_sums) = ((0., 0.), (0., 0.));
    for (first_bill, second_bill) in izip!(first, second) {
        let (usage_change_percent, cost_change_percent) = change_percentages(
            (first_bill.usage, second_bill.usage),
            (first_bill.cost, second_bill.cost),
        );
        records.push(BillComparisonRecord {
            start_month: first_bill.start_month,
            end_month: first_bill.end_month,
            first_usage: first_bill.usage,
            second_usage: second_bill.usage,
            first_cost: first_bill.cost,
            second_cost: second_bill.cost,
            usage_change_percent,
            cost_change_percent,
        });
        usage_sums = (usage_sums.0 + first_bill.usage, usage_sums.1 + second_bill.usage);
        cost_sums = (cost_sums.0 + first_bill.cost, cost_sums.1 + second_bill.cost);
    }
    let (usage_change_percent, cost_change_percent) = change_percentages(usage_sums, cost_sums);
    Ok(BillComparison {
        records,
        totals: BillComparisonTotals {
            first_usage: usage_sums.0,
            second_usage: usage_sums.1,
            first_cost: cost_sums.0,
            second_cost: cost_sums.1,
            usage_change_percent,
            cost_change_percent,
        },
    })
}

// Both percentages are withheld together when either usage is zero: a cost
// difference quoted against an empty period is as misleading as a usage one.
fn change_percentages(
    (first_usage, second_usage): (f64, f64),
    (first_cost, second_cost): (f64, f64),
) -> (Option<f64>, Option<f64>) {
    if first_usage == 0. || second_usage == 0. {
        return (None, None);
    }
    (
        Some((first_usage - second_usage) / first_usage * 100.),
        Some((first_cost - second_cost) / first_cost * 100.),
    )
}

/// Outcome of weighing an improvement's capital cost against its modelled
/// yearly savings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Payback {
    Achievable {
        capital_cost: f64,
        yearly_savings: f64,
        years: f64,
    },
    NotAchievable {
        yearly_savings: f64,
    },
}

impl Payback {
    /// Capital cost divided by yearly savings, defined only when the savings
    /// are positive.
    pub fn assess(capital_cost: f64, yearly_savings: f64) -> Self {
        if yearly_savings > 0. {
            Self::Achievable {
                capital_cost,
                yearly_savings,
                years: capital_cost / yearly_savings,
            }
        } else {
            Self::NotAchievable { yearly_savings }
        }
    }
}

impl Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payback::Achievable {
                capital_cost,
                yearly_savings,
                years,
            } => write!(
                f,
                "Payback period for a ${capital_cost:.2} investment with yearly savings of ${yearly_savings:.2} is {years:.1} years"
            ),
            Payback::NotAchievable { .. } => write!(
                f,
                "Payback is not achievable: the improved configuration costs as much or more to run"
            ),
        }
    }
}
