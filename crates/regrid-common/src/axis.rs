//! Validated coordinate axes.

use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};

/// An ordered sequence of coordinate values along one dimension.
///
/// The values must be strictly monotonic (ascending or descending) and there
/// must be at least two of them, so that a spacing is defined. Latitudes are
/// expected in [-90, 90]; longitudes in [-180, 180] or [0, 360).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateAxis {
    values: Vec<f64>,
}

impl CoordinateAxis {
    /// Create an axis from raw values, validating monotonicity.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(RegridError::invalid_axis(format!(
                "axis needs at least 2 points to define a spacing, got {}",
                values.len()
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RegridError::invalid_axis("axis contains non-finite values"));
        }

        let ascending = values[1] > values[0];
        for pair in values.windows(2) {
            let ok = if ascending {
                pair[1] > pair[0]
            } else {
                pair[1] < pair[0]
            };
            if !ok {
                return Err(RegridError::invalid_axis(format!(
                    "axis is not strictly monotonic near value {}",
                    pair[0]
                )));
            }
        }

        Ok(Self { values })
    }

    /// The coordinate values in declared order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of points on the axis.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// An axis is never empty; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First coordinate value.
    pub fn first(&self) -> f64 {
        self.values[0]
    }

    /// Last coordinate value.
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Whether the values increase along the axis.
    pub fn is_ascending(&self) -> bool {
        self.values[1] > self.values[0]
    }

    /// The mean spacing between consecutive points.
    pub fn spacing(&self) -> f64 {
        (self.last() - self.first()) / (self.len() - 1) as f64
    }

    /// A copy of this axis with the value order reversed.
    pub fn reversed(&self) -> Self {
        let mut values = self.values.clone();
        values.reverse();
        Self { values }
    }

    /// Position of a value on the axis, matched exactly.
    pub fn position(&self, value: f64) -> Option<usize> {
        self.values.iter().position(|&v| v == value)
    }
}
