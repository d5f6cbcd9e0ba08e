// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neuroweave-stats

Cross-run statistical aggregation of recorded activity.

A simulation run produces one binary activity matrix (elements x time
bins). This crate stacks the matrices of repeated runs and produces the
summary consumed by downstream analysis: per-cell mean, standard deviation
(with a floor substitution for exact-zero variance), z-score, one-sample
t-statistic against a fixed reference, and an any-activity mask.

The crate has no dependency on how the activity was generated; it consumes
whatever matrices the execution engine recorded.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use ndarray::Array2;
use tracing::info;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for aggregation operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Errors that can occur during aggregation
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("No runs supplied")]
    EmptyRunSet,

    #[error("At least 2 runs are required for cross-run statistics, got {0}")]
    TooFewRuns(usize),

    #[error("Run {index} has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Spike ({element}, {bin}) outside matrix of {elements} elements x {bins} bins")]
    SpikeOutOfBounds {
        element: usize,
        bin: usize,
        elements: usize,
        bins: usize,
    },

    #[error("Every cell has zero variance; z-scores are undefined")]
    DegenerateVariance,
}

/// Aggregated cross-run statistics, persisted as one named results object.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    pub name: String,
    /// Number of runs aggregated.
    pub runs: usize,
    /// Per-cell mean activity across runs.
    pub mean: Array2<f64>,
    /// Per-cell population standard deviation (ddof 0), with exact-zero
    /// entries replaced by the smallest non-zero std observed anywhere in
    /// the matrix, so the z-score never divides by zero.
    pub std: Array2<f64>,
    /// `mean / std` (floored std).
    pub z: Array2<f64>,
    /// One-sample t-statistic against the reference value (sample std,
    /// ddof 1). Cells with zero sample variance yield +/-inf, or NaN when
    /// the mean equals the reference, matching the usual convention.
    pub t: Array2<f64>,
    /// True where any run showed activity.
    pub any: Array2<bool>,
}

/// Build one run's binary activity matrix from (element, time-bin) spike
/// events. Repeated events for one cell are idempotent.
pub fn activity_matrix(
    spikes: impl IntoIterator<Item = (usize, usize)>,
    elements: usize,
    bins: usize,
) -> StatsResult<Array2<f64>> {
    let mut matrix = Array2::zeros((elements, bins));
    for (element, bin) in spikes {
        if element >= elements || bin >= bins {
            return Err(StatsError::SpikeOutOfBounds {
                element,
                bin,
                elements,
                bins,
            });
        }
        matrix[[element, bin]] = 1.0;
    }
    Ok(matrix)
}

/// Aggregate repeated runs into a named [`RunStatistics`] object.
///
/// All runs must share one shape. `reference` is the fixed value the
/// one-sample t-statistic tests against (0.5 for binary activity with no
/// preference).
pub fn aggregate(name: &str, runs: &[Array2<f64>], reference: f64) -> StatsResult<RunStatistics> {
    let n = runs.len();
    if n == 0 {
        return Err(StatsError::EmptyRunSet);
    }
    if n < 2 {
        return Err(StatsError::TooFewRuns(n));
    }

    let shape = runs[0].dim();
    for (index, run) in runs.iter().enumerate() {
        if run.dim() != shape {
            return Err(StatsError::ShapeMismatch {
                index,
                expected: shape,
                actual: run.dim(),
            });
        }
    }

    let nf = n as f64;
    let mut mean = Array2::<f64>::zeros(shape);
    for run in runs {
        mean += run;
    }
    mean /= nf;

    let mut var = Array2::<f64>::zeros(shape);
    for run in runs {
        let delta = run - &mean;
        var += &(&delta * &delta);
    }
    var /= nf;
    let std_raw = var.mapv(f64::sqrt);

    // Floor substitution: exact-zero std entries take the smallest non-zero
    // std observed, so z stays finite everywhere something varied.
    let floor = std_raw
        .iter()
        .copied()
        .filter(|&s| s > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !floor.is_finite() {
        return Err(StatsError::DegenerateVariance);
    }
    let std = std_raw.mapv(|s| if s == 0.0 { floor } else { s });

    let z = &mean / &std;

    // Sample std (ddof 1) for the t-statistic; the raw std is kept for the
    // reported std/z fields.
    let sample_std = var.mapv(|v| (v * nf / (nf - 1.0)).sqrt());
    let t = (&mean - reference) * nf.sqrt() / &sample_std;

    let mut any = Array2::from_elem(shape, false);
    for run in runs {
        for (cell, &v) in any.iter_mut().zip(run.iter()) {
            *cell = *cell || v != 0.0;
        }
    }

    info!(
        target: "neuroweave-stats",
        "Aggregated '{}': {} runs of {}x{} activity",
        name, n, shape.0, shape.1
    );

    Ok(RunStatistics {
        name: name.to_string(),
        runs: n,
        mean,
        std,
        z,
        t,
        any,
    })
}
