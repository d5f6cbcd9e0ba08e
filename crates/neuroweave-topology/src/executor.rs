// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Rule Executor - turns one connection rule into a batch of edges.

For each driver element the executor enumerates candidate partners in the
other layer, applies the mask as a geometric pre-filter, evaluates the
kernel at the (possibly wrapped) driver/candidate distance, and performs an
independent Bernoulli trial per pair. Accepted pairs resolve weight and
delay independently and emit one edge.

There is no de-duplication and no renormalization across candidates: every
candidate is an independent coin flip, so realized degrees are themselves
random, bounded only by the mask's geometric cardinality.
*/

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::geometry;
use crate::layer::{Element, Layer};
use crate::network::Edge;
use crate::rules::{ConnectionKind, ConnectionRule};
use crate::types::{RoleId, TopologyResult};

/// Execute one rule against its two (possibly identical) layers.
///
/// Edges come back in driver iteration order; the caller wraps them into a
/// per-rule batch for auditability.
pub(crate) fn execute_rule(
    rule: &ConnectionRule,
    source: &Layer,
    target: &Layer,
    rng: &mut StdRng,
) -> TopologyResult<Vec<Edge>> {
    rule.validate()?;

    // The driver side is the "one" in one-to-many: divergent rules iterate
    // sources and spread outward, convergent rules iterate targets and
    // gather inward.
    let (driver_layer, partner_layer, driver_filter, partner_filter) = match rule.kind {
        ConnectionKind::Divergent => (source, target, &rule.source_filter, &rule.target_filter),
        ConnectionKind::Convergent => (target, source, &rule.target_filter, &rule.source_filter),
    };

    let driver_role = resolve_filter(driver_layer, driver_filter)?;
    let partner_role = resolve_filter(partner_layer, partner_filter)?;

    // Candidates are enumerated once; the per-driver work is then a pure
    // scan. Wrap geometry follows the partner layer, the space being
    // searched for candidates.
    let candidates: Vec<&Element> = partner_layer
        .elements_with_role(partner_role)
        .collect();
    let extent = partner_layer.extent();
    let periodic = partner_layer.periodic();

    let mut edges = Vec::new();

    for driver in driver_layer.elements_with_role(driver_role) {
        for candidate in &candidates {
            if !rule
                .mask
                .contains(driver.position, candidate.position, extent, periodic)
            {
                continue;
            }

            let d = geometry::distance(driver.position, candidate.position, extent, periodic);
            let p = rule.kernel.probability(d);
            if p <= 0.0 || rng.gen::<f64>() >= p {
                continue;
            }

            let weight = rule.weight.resolve(rng);
            let delay = rule.delay.resolve(rng);
            let (src, dst) = match rule.kind {
                ConnectionKind::Divergent => (driver.id, candidate.id),
                ConnectionKind::Convergent => (candidate.id, driver.id),
            };
            edges.push(Edge {
                source: src,
                target: dst,
                weight,
                delay,
                synapse_label: rule.synapse_label.clone(),
            });
        }
    }

    debug!(
        target: "neuroweave-topology",
        "Executed rule {}: {} drivers x {} candidates -> {} edges",
        rule.summary(source.name(), target.name()),
        driver_layer.elements_with_role(driver_role).count(),
        candidates.len(),
        edges.len()
    );

    Ok(edges)
}

fn resolve_filter(layer: &Layer, filter: &Option<String>) -> TopologyResult<Option<RoleId>> {
    match filter {
        Some(name) => Ok(Some(layer.role_id(name)?)),
        None => Ok(None),
    }
}
