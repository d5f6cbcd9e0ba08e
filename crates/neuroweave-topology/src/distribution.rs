// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Randomized parameter resolution for per-edge weights and delays.

Each edge resolves its specs independently; nothing is shared across the
edges of one rule.
*/

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{TopologyError, TopologyResult};

/// A scalar parameter: either a fixed value or a uniform range sampled
/// fresh on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSpec {
    Fixed(f64),
    Uniform { min: f64, max: f64 },
}

impl ValueSpec {
    pub fn validate(&self) -> TopologyResult<()> {
        match *self {
            ValueSpec::Fixed(v) => {
                if !v.is_finite() {
                    return Err(TopologyError::InvalidDistribution(format!(
                        "fixed value must be finite, got {v}"
                    )));
                }
            }
            ValueSpec::Uniform { min, max } => {
                if !min.is_finite() || !max.is_finite() || min > max {
                    return Err(TopologyError::InvalidDistribution(format!(
                        "uniform range requires finite min <= max, got [{min}, {max}]"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Validate and additionally reject negative values (delays).
    pub fn validate_non_negative(&self) -> TopologyResult<()> {
        self.validate()?;
        let floor = match *self {
            ValueSpec::Fixed(v) => v,
            ValueSpec::Uniform { min, .. } => min,
        };
        if floor < 0.0 {
            return Err(TopologyError::InvalidDistribution(format!(
                "value must be non-negative, got spec {self:?}"
            )));
        }
        Ok(())
    }

    /// Draw one value. Fixed specs return the constant without consuming
    /// randomness, so a fully deterministic rule stays deterministic.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> f64 {
        match *self {
            ValueSpec::Fixed(v) => v,
            ValueSpec::Uniform { min, max } => {
                if min == max {
                    min
                } else {
                    rng.gen_range(min..=max)
                }
            }
        }
    }
}
