// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# neuroweave-topology

This crate implements spatial connectivity generation for layered network
models:

- Layers (regular 2-D grids of typed, positioned elements)
- Geometric masks and distance-dependent probability kernels
- Convergent/divergent connection rules with randomized weights and delays
- A network builder that aggregates rule results into a final edge graph

## Architecture

```text
Caller: define LayerSpecs + ordered ConnectionRules
           ↓
NetworkBuilder: instantiate layers (grid-centered positions, role tags)
           ↓
Rule Executor: per rule - driver set, mask pre-filter, kernel Bernoulli
               trial, weight/delay sampling
           ↓
Graph: per-rule edge batches, handed to an external execution engine
```

Layers and elements are immutable once created; rules are mutually
independent and each draws from its own deterministically seeded RNG
sub-stream, so a build is reproducible for a fixed master seed regardless
of scheduling.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod distribution;
pub mod executor;
pub mod geometry;
pub mod kernel;
pub mod layer;
pub mod network;
pub mod rules;
pub mod types;

pub use distribution::ValueSpec;
pub use geometry::{Extent, Mask, Position};
pub use kernel::Kernel;
pub use layer::{Element, InitFailure, Layer, LayerSpec};
pub use network::{Edge, EdgeBatch, Graph, NetworkBuilder};
pub use rules::{ConnectionKind, ConnectionRule, RuleOverrides};
pub use types::{ElementId, LayerId, RoleId, TopologyError, TopologyResult};
