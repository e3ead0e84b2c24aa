use crate::core::units::MONTHS_PER_YEAR;
use crate::errors::ModelError;
use crate::input::{Orientation, SolarCoefficientRow, SolarGeometryRow};
use indexmap::IndexMap;

/// Reserved angle bucket holding the coefficient applied to diffuse
/// radiation.
pub const DIFFUSE_BUCKET: i32 = -1;

/// Solar heat gain coefficients keyed by incidence angle bucket.
#[derive(Clone, Debug)]
pub struct SolarCoefficients {
    by_angle: IndexMap<i32, f64>,
}

impl SolarCoefficients {
    pub fn new(rows: &[SolarCoefficientRow]) -> Result<Self, ModelError> {
        let mut by_angle = IndexMap::with_capacity(rows.len());
        for row in rows {
            if by_angle.insert(row.angle, row.coefficient).is_some() {
                return Err(ModelError::DuplicateSolarCoefficient { angle: row.angle });
            }
        }
        Ok(Self { by_angle })
    }

    /// Coefficient for beam radiation arriving at the given incidence angle.
    /// Angles are bucketed, not interpolated, so the lookup is exact.
    pub fn at_angle(&self, angle: i32) -> Result<f64, ModelError> {
        self.by_angle
            .get(&angle)
            .copied()
            .ok_or(ModelError::MissingSolarCoefficient { angle })
    }

    pub fn diffuse(&self) -> Result<f64, ModelError> {
        self.by_angle
            .get(&DIFFUSE_BUCKET)
            .copied()
            .ok_or(ModelError::MissingDiffuseCoefficient)
    }
}

/// Effective beam incidence on a vertical face for one month: the angle the
/// sun strikes the face at and the fraction of daylight hours the face sees
/// direct beam radiation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarIncidence {
    pub angle: i32,
    pub beam_exposure: f64,
}

/// Per-(month, orientation) beam incidence lookup, expanded from the compact
/// seasonal rows of the geometry table.
#[derive(Clone, Debug)]
pub struct SolarGeometry {
    by_month_orientation: IndexMap<(u32, Orientation), SolarIncidence>,
}

impl SolarGeometry {
    /// Each (month, orientation) pair must come out of the expansion exactly
    /// once; overlapping seasonal rows are a table defect, not a precedence
    /// question.
    pub fn new(rows: &[SolarGeometryRow]) -> Result<Self, ModelError> {
        let mut by_month_orientation = IndexMap::new();
        for row in rows {
            let incidence = SolarIncidence {
                angle: row.incidence_angle,
                beam_exposure: row.exposure_percent / 100.,
            };
            for &month in &row.months {
                if !(1..=MONTHS_PER_YEAR).contains(&month) {
                    return Err(ModelError::MonthOutOfRange { month });
                }
                if by_month_orientation
                    .insert((month, row.orientation), incidence)
                    .is_some()
                {
                    return Err(ModelError::DuplicateSolarGeometry {
                        month,
                        orientation: row.orientation,
                    });
                }
            }
        }
        Ok(Self {
            by_month_orientation,
        })
    }

    pub fn incidence(
        &self,
        month: u32,
        orientation: Orientation,
    ) -> Result<SolarIncidence, ModelError> {
        self.by_month_orientation
            .get(&(month, orientation))
            .copied()
            .ok_or(ModelError::MissingSolarGeometry { month, orientation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn coefficients() -> SolarCoefficients {
        SolarCoefficients::new(&[
            SolarCoefficientRow {
                angle: 30,
                coefficient: 0.52,
            },
            SolarCoefficientRow {
                angle: 60,
                coefficient: 0.4,
            },
            SolarCoefficientRow {
                angle: DIFFUSE_BUCKET,
                coefficient: 0.45,
            },
        ])
        .unwrap()
    }

    #[rstest]
    fn should_look_up_coefficients_by_exact_angle(coefficients: SolarCoefficients) {
        assert_eq!(coefficients.at_angle(30).unwrap(), 0.52);
        assert_eq!(coefficients.diffuse().unwrap(), 0.45);
        assert_eq!(
            coefficients.at_angle(45).err(),
            Some(ModelError::MissingSolarCoefficient { angle: 45 })
        );
    }

    #[rstest]
    fn should_reject_repeated_angle_buckets() {
        let rows = [
            SolarCoefficientRow {
                angle: 30,
                coefficient: 0.52,
            },
            SolarCoefficientRow {
                angle: 30,
                coefficient: 0.5,
            },
        ];
        assert_eq!(
            SolarCoefficients::new(&rows).err(),
            Some(ModelError::DuplicateSolarCoefficient { angle: 30 })
        );
    }

    #[rstest]
    fn should_report_a_missing_diffuse_bucket() {
        let coefficients = SolarCoefficients::new(&[SolarCoefficientRow {
            angle: 30,
            coefficient: 0.52,
        }])
        .unwrap();
        assert_eq!(
            coefficients.diffuse().err(),
            Some(ModelError::MissingDiffuseCoefficient)
        );
    }

    #[rstest]
    fn should_expand_seasonal_rows_into_month_lookups() {
        let geometry = SolarGeometry::new(&[
            SolarGeometryRow {
                months: vec![11, 12, 1, 2],
                orientation: Orientation::South,
                incidence_angle: 30,
                exposure_percent: 70.,
            },
            SolarGeometryRow {
                months: vec![3, 4],
                orientation: Orientation::South,
                incidence_angle: 45,
                exposure_percent: 60.,
            },
        ])
        .unwrap();
        assert_eq!(
            geometry.incidence(1, Orientation::South).unwrap(),
            SolarIncidence {
                angle: 30,
                beam_exposure: 0.7,
            }
        );
        assert_eq!(
            geometry.incidence(4, Orientation::South).unwrap(),
            SolarIncidence {
                angle: 45,
                beam_exposure: 0.6,
            }
        );
        assert_eq!(
            geometry.incidence(3, Orientation::West).err(),
            Some(ModelError::MissingSolarGeometry {
                month: 3,
                orientation: Orientation::West,
            })
        );
    }

    #[rstest]
    fn should_reject_overlapping_seasonal_rows() {
        let rows = [
            SolarGeometryRow {
                months: vec![1, 2],
                orientation: Orientation::South,
                incidence_angle: 30,
                exposure_percent: 70.,
            },
            SolarGeometryRow {
                months: vec![2, 3],
                orientation: Orientation::South,
                incidence_angle: 45,
                exposure_percent: 60.,
            },
        ];
        assert_eq!(
            SolarGeometry::new(&rows).err(),
            Some(ModelError::DuplicateSolarGeometry {
                month: 2,
                orientation: Orientation::South,
            })
        );
    }

    #[rstest]
    fn should_reject_out_of_range_months_in_seasonal_rows() {
        let rows = [SolarGeometryRow {
            months: vec![1, 13],
            orientation: Orientation::South,
            incidence_angle: 30,
            exposure_percent: 70.,
        }];
        assert_eq!(
            SolarGeometry::new(&rows).err(),
            Some(ModelError::MonthOutOfRange { month: 13 })
        );
    }
}
