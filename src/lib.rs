//! # neuroweave - Spatial Connectivity Generation
//!
//! neuroweave builds large, spatially organized directed weighted graphs
//! connecting populations of elements arranged on regular 2-D grids. Layers
//! of typed, positioned elements are wired by declarative connection rules
//! that combine geometric masks, distance-dependent probability kernels, and
//! randomized weight/delay assignment, under toroidal or bounded geometry.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neuroweave = "0.1"
//! ```
//!
//! ```rust
//! use neuroweave::topology::{
//!     ConnectionKind, ConnectionRule, Extent, Kernel, LayerSpec, Mask,
//!     NetworkBuilder, ValueSpec,
//! };
//!
//! let mut builder = NetworkBuilder::with_seed(42);
//! let retina = builder.create_layer(&LayerSpec {
//!     name: "retina".into(),
//!     rows: 40,
//!     columns: 40,
//!     extent: Extent::new(8.0, 8.0),
//!     periodic: true,
//!     composition: vec![("RetinaNode".into(), 1)],
//! })?;
//! let thalamus = builder.create_layer(&LayerSpec {
//!     name: "Tp".into(),
//!     rows: 40,
//!     columns: 40,
//!     extent: Extent::new(8.0, 8.0),
//!     periodic: true,
//!     composition: vec![("TpRelay".into(), 1), ("TpInter".into(), 1)],
//! })?;
//!
//! let rule = ConnectionRule {
//!     source: retina,
//!     target: thalamus,
//!     source_filter: None,
//!     target_filter: Some("TpRelay".into()),
//!     kind: ConnectionKind::Divergent,
//!     mask: Mask::Circular { radius: 0.2 },
//!     kernel: Kernel::Gaussian { p_center: 0.75, sigma: 0.5 },
//!     weight: ValueSpec::Fixed(10.0),
//!     delay: ValueSpec::Fixed(1.0),
//!     synapse_label: "AMPA".into(),
//! };
//!
//! let graph = builder.apply_rules(&[rule])?;
//! println!("{} edges", graph.edge_count());
//! # Ok::<(), neuroweave::topology::TopologyError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`parallel`**: execute independent rules across rayon workers; the
//!   realized graph is identical to the sequential build because every rule
//!   draws from its own deterministically seeded RNG sub-stream.
//!
//! ## Crates
//!
//! - [`topology`]: layers, masks, kernels, rules, and the network builder.
//! - [`stats`]: cross-run aggregation of recorded activity matrices.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use neuroweave_stats as stats;
pub use neuroweave_topology as topology;

/// Commonly used items for building networks end to end.
pub mod prelude {
    pub use neuroweave_stats::{aggregate, RunStatistics};
    pub use neuroweave_topology::{
        ConnectionKind, ConnectionRule, Edge, Extent, Graph, Kernel, LayerSpec, Mask,
        NetworkBuilder, Position, RuleOverrides, TopologyError, TopologyResult, ValueSpec,
    };
}
