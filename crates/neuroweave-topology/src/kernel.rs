// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Probability kernels - map a driver/candidate distance to a connection
probability. Kernels are evaluated only on pairs that already passed the
mask pre-filter.
*/

use serde::{Deserialize, Serialize};

use crate::types::{TopologyError, TopologyResult};

/// Distance-to-probability function applied within a mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// Same probability for every in-mask pair, regardless of distance.
    Constant { p: f64 },
    /// `p = p_center * exp(-d^2 / (2 sigma^2))`
    Gaussian { p_center: f64, sigma: f64 },
}

impl Kernel {
    /// Configuration check: the kernel's peak must be a valid probability.
    ///
    /// A Gaussian with `p_center > 1` would exceed 1 at `d = 0`; that is a
    /// configuration error, not something to clamp silently.
    pub fn validate(&self) -> TopologyResult<()> {
        match *self {
            Kernel::Constant { p } => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(TopologyError::InvalidKernel(format!(
                        "constant kernel probability must lie in [0,1], got {p}"
                    )));
                }
            }
            Kernel::Gaussian { p_center, sigma } => {
                if !(0.0..=1.0).contains(&p_center) {
                    return Err(TopologyError::InvalidKernel(format!(
                        "gaussian kernel peak must lie in [0,1], got p_center={p_center}"
                    )));
                }
                if !(sigma > 0.0) || !sigma.is_finite() {
                    return Err(TopologyError::InvalidKernel(format!(
                        "gaussian kernel sigma must be positive, got {sigma}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Connection probability for a pair at distance `d`.
    ///
    /// The result is clamped to [0,1] against floating-point drift; out-of-
    /// range peaks were already rejected by [`Kernel::validate`].
    pub fn probability(&self, d: f64) -> f64 {
        match *self {
            Kernel::Constant { p } => p,
            Kernel::Gaussian { p_center, sigma } => {
                (p_center * (-d * d / (2.0 * sigma * sigma)).exp()).clamp(0.0, 1.0)
            }
        }
    }
}
