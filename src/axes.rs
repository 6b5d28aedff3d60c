/// Per-axis filtering: three independent scalar Kalman filters, one for
/// each accelerometer axis, plus the 3-vector sample type they operate on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kalman::ScalarEstimator;

/// One accelerometer sample or estimate, in g-force per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
            Axis::Z => f.write_str("z"),
        }
    }
}

/// A filter produced a NaN or infinite estimate. The offending sample never
/// reaches the peak tracker or a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("filter produced a non-finite estimate on the {axis} axis")]
pub struct DegenerateFilterState {
    pub axis: Axis,
}

/// Three independent estimators, default parameters (r = q = 1, identity
/// dynamics). No state is shared between axes.
pub struct AxisBank {
    x: ScalarEstimator,
    y: ScalarEstimator,
    z: ScalarEstimator,
}

impl AxisBank {
    pub fn new() -> Self {
        Self {
            x: ScalarEstimator::new(),
            y: ScalarEstimator::new(),
            z: ScalarEstimator::new(),
        }
    }

    /// Filter one raw sample component-wise and return the denoised vector.
    pub fn update(&mut self, raw: Vector3) -> Result<Vector3, DegenerateFilterState> {
        let filtered = Vector3 {
            x: self.x.filter(raw.x, 0.0),
            y: self.y.filter(raw.y, 0.0),
            z: self.z.filter(raw.z, 0.0),
        };

        for (axis, value) in [
            (Axis::X, filtered.x),
            (Axis::Y, filtered.y),
            (Axis::Z, filtered.z),
        ] {
            if !value.is_finite() {
                return Err(DegenerateFilterState { axis });
            }
        }

        Ok(filtered)
    }
}

impl Default for AxisBank {
    fn default() -> Self {
        Self::new()
    }
}
