use crate::core::units::MONTHS_PER_YEAR;
use crate::errors::ModelError;
use crate::input::ClimateRecord;

/// A year of monthly climate normals, validated to cover each calendar month
/// exactly once and indexable by 1-based month number.
#[derive(Clone, Debug)]
pub struct Climate {
    months: Vec<ClimateRecord>,
}

impl Climate {
    pub fn new(records: Vec<ClimateRecord>) -> Result<Self, ModelError> {
        if records.len() != MONTHS_PER_YEAR as usize {
            return Err(ModelError::IncompleteClimate {
                count: records.len(),
            });
        }
        let mut months = records;
        months.sort_by_key(|record| record.month);
        for (index, record) in months.iter().enumerate() {
            if record.month != index as u32 + 1 {
                return Err(ModelError::ClimateCoverage {
                    month: record.month,
                });
            }
        }
        Ok(Self { months })
    }

    pub fn month(&self, month: u32) -> Result<&ClimateRecord, ModelError> {
        if !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(ModelError::MonthOutOfRange { month });
        }
        Ok(&self.months[(month - 1) as usize])
    }
}
