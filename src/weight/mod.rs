// src/weight/mod.rs
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{FlowError, Result};
use crate::schema::FlowRecord;

/// Substituted for a zero log range so equal values do not divide by zero.
pub const LOG_EPSILON: f64 = 1e-9;

/// Log-domain min-max stroke weights, relative to the subset passed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualWeightMapper {
    pub min: f64,
    pub max: f64,
    /// Emphasis curve applied to the normalized value.
    pub exponent: f64,
}

impl Default for VisualWeightMapper {
    fn default() -> Self {
        Self {
            min: 0.8,
            max: 14.0,
            exponent: 1.15,
        }
    }
}

impl VisualWeightMapper {
    pub fn new(min: f64, max: f64, exponent: f64) -> Result<Self> {
        let m = Self { min, max, exponent };
        m.validate()?;
        Ok(m)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || !self.exponent.is_finite() {
            return Err(FlowError::WeightRange(format!(
                "non-finite bound in {:?}",
                self
            )));
        }
        if self.min > self.max {
            return Err(FlowError::WeightRange(format!(
                "min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.exponent <= 0.0 {
            return Err(FlowError::WeightRange(format!(
                "exponent must be positive, got {}",
                self.exponent
            )));
        }
        Ok(())
    }

    /// One weight per input value, in input order. Empty in, empty out.
    pub fn weights(&self, values: &[f64]) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }

        let logs: Vec<f64> = values.iter().map(|v| v.max(0.0).ln_1p()).collect();
        let min_log = logs.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max_log = logs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max_log <= min_log {
            max_log = min_log + LOG_EPSILON;
        }
        trace!(min_log, max_log, n = values.len(), "weight range");

        logs.into_iter()
            .map(|l| {
                let t = ((l - min_log) / (max_log - min_log)).clamp(0.0, 1.0);
                self.min + t.powf(self.exponent) * (self.max - self.min)
            })
            .collect()
    }

    /// Annotate every record of the rendered subset with its weight.
    pub fn annotate(&self, subset: Vec<FlowRecord>) -> Vec<FlowRecord> {
        let values: Vec<f64> = subset.iter().map(|r| r.display_value).collect();
        let weights = self.weights(&values);
        subset
            .into_iter()
            .zip(weights)
            .map(|(r, w)| r.with_weight(w))
            .collect()
    }
}
