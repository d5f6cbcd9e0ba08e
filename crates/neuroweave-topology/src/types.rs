// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for topology operations.
*/

use serde::{Deserialize, Serialize};

/// Unique element identifier, assigned sequentially across all layers of a
/// builder and immutable for the element's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

/// Layer identifier within one `NetworkBuilder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

/// Element role tag, resolved from a role name at layer-creation time.
///
/// Roles are per-layer: a `RoleId` indexes into the owning layer's declared
/// role table and must not be compared across layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u16);

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur during topology construction.
///
/// Configuration errors are reported eagerly, before any sampling, so that
/// authoring mistakes in a model are never silently clamped away.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Invalid layer '{name}': {reason}")]
    InvalidLayer { name: String, reason: String },

    #[error("Unknown layer id {0:?}")]
    UnknownLayer(LayerId),

    #[error("Unknown role '{role}' in layer '{layer}'")]
    UnknownRole { layer: String, role: String },

    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("Rule {index} ({summary}) failed: {cause}")]
    RuleFailed {
        index: usize,
        summary: String,
        #[source]
        cause: Box<TopologyError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}
