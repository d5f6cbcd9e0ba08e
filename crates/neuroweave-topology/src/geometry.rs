// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Geometry primitives - positions, toroidal distance, mask containment.

All functions here are pure. Distances on periodic layers use the
minimum-image convention per axis: the reported distance is the shortest
path on the torus spanned by the layer extent.
*/

use serde::{Deserialize, Serialize};

use crate::types::{TopologyError, TopologyResult};

/// A 2-D coordinate in a layer's physical extent (degrees/units), not grid
/// indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Physical size of a layer (width, height), centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reject zero or negative extents; wrap arithmetic divides by the span.
    pub fn validate(&self) -> TopologyResult<()> {
        if !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
        {
            return Err(TopologyError::InvalidExtent(format!(
                "extent must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Minimum-image wrap of a single axis component.
fn wrap_component(delta: f64, span: f64) -> f64 {
    delta - span * (delta / span).round()
}

/// Displacement `to - from`, component-wise, wrapped per axis when periodic.
pub fn displacement(from: Position, to: Position, extent: Extent, periodic: bool) -> (f64, f64) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if periodic {
        (
            wrap_component(dx, extent.width),
            wrap_component(dy, extent.height),
        )
    } else {
        (dx, dy)
    }
}

/// Euclidean distance between two positions under the layer geometry.
pub fn distance(a: Position, b: Position, extent: Extent, periodic: bool) -> f64 {
    let (dx, dy) = displacement(a, b, extent, periodic);
    (dx * dx + dy * dy).sqrt()
}

/// Geometric region relative to a driver element's position, used to
/// pre-filter candidate partners before any probability is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mask {
    /// All candidates within `radius` of the driver (boundary inclusive).
    Circular { radius: f64 },
    /// Axis-aligned box of offsets from the driver, bounds inclusive.
    Rectangular {
        lower_left: (f64, f64),
        upper_right: (f64, f64),
    },
}

impl Mask {
    /// Configuration check: zero/negative radius and malformed rectangular
    /// bounds abort rule construction rather than silently matching nothing.
    pub fn validate(&self) -> TopologyResult<()> {
        match *self {
            Mask::Circular { radius } => {
                if !(radius > 0.0) || !radius.is_finite() {
                    return Err(TopologyError::InvalidMask(format!(
                        "circular mask radius must be positive, got {radius}"
                    )));
                }
            }
            Mask::Rectangular {
                lower_left,
                upper_right,
            } => {
                if upper_right.0 <= lower_left.0 || upper_right.1 <= lower_left.1 {
                    return Err(TopologyError::InvalidMask(format!(
                        "rectangular mask upper_right {upper_right:?} must exceed lower_left {lower_left:?} on both axes"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Test whether `candidate` lies inside the mask centered on `driver`,
    /// under the geometry of the candidate's layer.
    pub fn contains(
        &self,
        driver: Position,
        candidate: Position,
        extent: Extent,
        periodic: bool,
    ) -> bool {
        match *self {
            Mask::Circular { radius } => {
                distance(driver, candidate, extent, periodic) <= radius
            }
            Mask::Rectangular {
                lower_left,
                upper_right,
            } => {
                let (dx, dy) = displacement(driver, candidate, extent, periodic);
                dx >= lower_left.0 && dx <= upper_right.0 && dy >= lower_left.1 && dy <= upper_right.1
            }
        }
    }
}
