//! Curve - Piecewise-linear breakpoint tables
//!
//! Character attributes, weapon ATK and arts intensity effects are all defined
//! by sparse control points. Values between two points are linearly
//! interpolated; values outside the table clamp to the nearest end.

pub mod arts;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Character levels at which attribute and weapon ATK tables are defined
pub const ATTRIBUTE_LEVELS: [f64; 6] = [1.0, 20.0, 40.0, 60.0, 80.0, 90.0];

/// Breakpoint table construction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    #[error("breakpoint table needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("breakpoint x values must be strictly increasing (at index {0})")]
    NotIncreasing(usize),
}

/// A validated, ordered list of `(x, y)` control points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct BreakpointTable {
    points: Vec<(f64, f64)>,
}

impl BreakpointTable {
    /// Create a table; needs at least two points with strictly increasing x
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }
        if let Some(index) = points.windows(2).position(|pair| pair[1].0 <= pair[0].0) {
            return Err(CurveError::NotIncreasing(index + 1));
        }
        Ok(BreakpointTable { points })
    }

    /// Create a table from values at [`ATTRIBUTE_LEVELS`]
    pub fn from_levels(values: [f64; 6]) -> Result<Self, CurveError> {
        Self::new(ATTRIBUTE_LEVELS.iter().copied().zip(values).collect())
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Interpolated value at `x`, clamped outside the table's domain
    pub fn value_at(&self, x: f64) -> f64 {
        sample(&self.points, x)
    }

    /// Interpolated value at `x`, floored
    pub fn floor_at(&self, x: f64) -> f64 {
        self.value_at(x).floor()
    }
}

impl TryFrom<Vec<(f64, f64)>> for BreakpointTable {
    type Error = CurveError;

    fn try_from(points: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        BreakpointTable::new(points)
    }
}

impl From<BreakpointTable> for Vec<(f64, f64)> {
    fn from(table: BreakpointTable) -> Self {
        table.points
    }
}

/// Validate `points` and interpolate at `x`
pub fn interpolate(points: &[(f64, f64)], x: f64) -> Result<f64, CurveError> {
    let table = BreakpointTable::new(points.to_vec())?;
    Ok(table.value_at(x))
}

/// Interpolate over points already known to be ordered
pub(crate) fn sample(points: &[(f64, f64)], x: f64) -> f64 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in points.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if x == upper.0 {
            return upper.1;
        }
        if x < upper.0 {
            return lower.1 + (upper.1 - lower.1) * (x - lower.0) / (upper.0 - lower.0);
        }
    }
    last.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn atk_table() -> BreakpointTable {
        BreakpointTable::from_levels([30.0, 120.0, 220.0, 310.0, 420.0, 480.0]).unwrap()
    }

    #[test]
    fn test_rejects_short_tables() {
        assert_eq!(BreakpointTable::new(vec![]), Err(CurveError::TooFewPoints(0)));
        assert_eq!(BreakpointTable::new(vec![(1.0, 5.0)]), Err(CurveError::TooFewPoints(1)));
    }

    #[test]
    fn test_rejects_unordered_x() {
        let result = BreakpointTable::new(vec![(1.0, 0.0), (20.0, 10.0), (20.0, 12.0)]);
        assert_eq!(result, Err(CurveError::NotIncreasing(2)));
    }

    #[test]
    fn test_exact_breakpoints() {
        let table = atk_table();
        assert!((table.value_at(1.0) - 30.0).abs() < f64::EPSILON);
        assert!((table.value_at(40.0) - 220.0).abs() < f64::EPSILON);
        assert!((table.value_at(90.0) - 480.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interpolates_between_points() {
        let table = atk_table();
        // 20 -> 120, 40 -> 220: halfway is 170
        assert!((table.value_at(30.0) - 170.0).abs() < f64::EPSILON);
        // 80 -> 420, 90 -> 480: level 85 = 450
        assert!((table.floor_at(85.0) - 450.0).abs() < f64::EPSILON);
        // 1 -> 30, 20 -> 120: level 10 = 30 + 90 * 9/19 = 72.63
        assert!((table.floor_at(10.0) - 72.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clamps_outside_domain() {
        let table = atk_table();
        assert!((table.value_at(0.0) - 30.0).abs() < f64::EPSILON);
        assert!((table.value_at(-5.0) - 30.0).abs() < f64::EPSILON);
        assert!((table.value_at(120.0) - 480.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interpolate_validates() {
        assert!(interpolate(&[(0.0, 1.0)], 0.0).is_err());
        let value = interpolate(&[(0.0, 0.0), (10.0, 100.0)], 2.5).unwrap();
        assert!((value - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_deserialize_validates() {
        let table: BreakpointTable = serde_json::from_str("[[1, 10], [20, 30]]").unwrap();
        assert_eq!(table.points().len(), 2);
        assert!(serde_json::from_str::<BreakpointTable>("[[1, 10]]").is_err());
    }

    fn integer_table() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((1u32..50, 0u32..500), 2..10).prop_map(|steps| {
            let mut x = 0.0;
            let mut y = 0.0;
            steps
                .into_iter()
                .map(|(dx, dy)| {
                    x += dx as f64;
                    y += dy as f64;
                    (x, y)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_control_points_exact(points in integer_table()) {
            let table = BreakpointTable::new(points.clone()).unwrap();
            for (x, y) in points {
                prop_assert_eq!(table.floor_at(x), y);
            }
        }

        #[test]
        fn prop_monotonic_for_non_decreasing_y(points in integer_table(), a in 0.0f64..600.0, b in 0.0f64..600.0) {
            let table = BreakpointTable::new(points).unwrap();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.value_at(low) <= table.value_at(high));
            prop_assert!(table.floor_at(low) <= table.floor_at(high));
        }

        #[test]
        fn prop_clamps_outside(points in integer_table(), below in 0.0f64..1.0, above in 0.0f64..1000.0) {
            let table = BreakpointTable::new(points.clone()).unwrap();
            let first = points[0];
            let last = points[points.len() - 1];
            prop_assert_eq!(table.value_at(first.0 - below - 0.001), first.1);
            prop_assert_eq!(table.value_at(last.0 + above), last.1);
        }
    }
}
