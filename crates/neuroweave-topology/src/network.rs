// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Network builder - layer registry and rule orchestration.

`NetworkBuilder` is an explicitly constructed, passed-by-reference object;
there is no ambient "current network" global. It owns the layers it
creates, applies an ordered list of connection rules, and aggregates the
resulting edges into a [`Graph`] for an external execution engine.

## Reproducibility

The builder holds a master seed. Each rule draws from its own RNG
sub-stream, seeded with `xxh64(rule_index, master_seed)`, so the realized
graph is identical whether rules run sequentially or across rayon workers
(`parallel` feature). Changing the master seed changes the realized (but
not the statistically expected) graph.
*/

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use xxhash_rust::xxh64::xxh64;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::executor::execute_rule;
use crate::geometry::Position;
use crate::layer::{Element, InitFailure, Layer, LayerSpec};
use crate::rules::ConnectionRule;
use crate::types::{ElementId, LayerId, TopologyError, TopologyResult};

/// One realized directed connection. Immutable once created; rerunning a
/// rule produces new edges rather than updating existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: ElementId,
    pub target: ElementId,
    /// Signed weight; negative values route to inhibitory synapses
    /// downstream.
    pub weight: f64,
    /// Non-negative delay.
    pub delay: f64,
    pub synapse_label: String,
}

/// All edges emitted by one rule application, kept together for
/// auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBatch {
    pub rule_index: usize,
    pub edges: Vec<Edge>,
}

/// The complete accumulated set of edges from applying an ordered rule
/// list. Every endpoint referenced an existing element at rule-execution
/// time; layers outlive the graph inside the builder, so there are no
/// dangling references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    batches: Vec<EdgeBatch>,
}

impl Graph {
    /// Per-rule batches, in rule order.
    pub fn batches(&self) -> &[EdgeBatch] {
        &self.batches
    }

    /// Every edge across all batches, in rule order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.batches.iter().flat_map(|b| b.edges.iter())
    }

    pub fn edge_count(&self) -> usize {
        self.batches.iter().map(|b| b.edges.len()).sum()
    }
}

/// Layer registry and rule orchestrator.
pub struct NetworkBuilder {
    layers: Vec<Layer>,
    next_element_id: u32,
    seed: u64,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl NetworkBuilder {
    /// Builder with master seed 0. Use [`NetworkBuilder::with_seed`] for
    /// distinct reproducible realizations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            layers: Vec::new(),
            next_element_id: 0,
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Instantiate a layer: `rows * columns * sum(composition counts)`
    /// elements at grid-cell centers. Deterministic, consumes no
    /// randomness.
    pub fn create_layer(&mut self, spec: &LayerSpec) -> TopologyResult<LayerId> {
        let id = LayerId(self.layers.len() as u32);
        let layer = Layer::instantiate(id, spec, &mut self.next_element_id)?;
        info!(
            target: "neuroweave-topology",
            "Created layer '{}' ({:?}): {} elements",
            layer.name(), id, layer.elements().len()
        );
        self.layers.push(layer);
        Ok(id)
    }

    pub fn layer(&self, id: LayerId) -> TopologyResult<&Layer> {
        self.layers
            .get(id.0 as usize)
            .ok_or(TopologyError::UnknownLayer(id))
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Filtered element enumeration, used internally by rule execution and
    /// externally for recording/device setup.
    pub fn lookup(&self, layer: LayerId, role_filter: Option<&str>) -> TopologyResult<Vec<&Element>> {
        let layer = self.layer(layer)?;
        let role = match role_filter {
            Some(name) => Some(layer.role_id(name)?),
            None => None,
        };
        Ok(layer.elements_with_role(role).collect())
    }

    /// Run an external attribute initializer over every element of a layer,
    /// exactly once per element. Failures are returned per element id; the
    /// remaining elements are still initialized.
    pub fn apply_initializer<F>(
        &mut self,
        layer: LayerId,
        init: F,
    ) -> TopologyResult<Vec<InitFailure>>
    where
        F: FnMut(Position) -> Result<f64, String>,
    {
        let layer = self
            .layers
            .get_mut(layer.0 as usize)
            .ok_or(TopologyError::UnknownLayer(layer))?;
        Ok(layer.apply_initializer(init))
    }

    /// Execute an ordered rule list and aggregate the edges.
    ///
    /// All-or-nothing: any rule failure discards the partial graph and
    /// reports the failing rule's index, endpoints, and filters, so an
    /// incomplete topology is never shipped silently.
    pub fn apply_rules(&self, rules: &[ConnectionRule]) -> TopologyResult<Graph> {
        #[cfg(feature = "parallel")]
        let results: Vec<TopologyResult<EdgeBatch>> = rules
            .par_iter()
            .enumerate()
            .map(|(index, rule)| self.run_rule(index, rule))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<TopologyResult<EdgeBatch>> = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| self.run_rule(index, rule))
            .collect();

        let mut batches = Vec::with_capacity(results.len());
        for result in results {
            batches.push(result?);
        }
        let graph = Graph { batches };

        info!(
            target: "neuroweave-topology",
            "Applied {} rules: {} edges total",
            rules.len(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn run_rule(&self, index: usize, rule: &ConnectionRule) -> TopologyResult<EdgeBatch> {
        self.run_rule_inner(index, rule)
            .map_err(|cause| TopologyError::RuleFailed {
                index,
                summary: rule.summary(
                    self.layer_name_or(rule.source, "?"),
                    self.layer_name_or(rule.target, "?"),
                ),
                cause: Box::new(cause),
            })
    }

    fn run_rule_inner(&self, index: usize, rule: &ConnectionRule) -> TopologyResult<EdgeBatch> {
        let source = self.layer(rule.source)?;
        let target = self.layer(rule.target)?;
        let mut rng = self.rule_rng(index);
        let edges = execute_rule(rule, source, target, &mut rng)?;
        Ok(EdgeBatch {
            rule_index: index,
            edges,
        })
    }

    /// Deterministic per-rule sub-stream: the same (seed, index) pair
    /// always yields the same RNG, independent of scheduling.
    fn rule_rng(&self, index: usize) -> StdRng {
        StdRng::seed_from_u64(xxh64(&(index as u64).to_le_bytes(), self.seed))
    }

    fn layer_name_or(&self, id: LayerId, fallback: &'static str) -> &str {
        self.layers
            .get(id.0 as usize)
            .map(|l| l.name())
            .unwrap_or(fallback)
    }
}
