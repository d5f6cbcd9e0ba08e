// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connection rules - declarative wiring between two layers.

Model descriptions tend to define a base projection and vary a few fields
per pathway (mask radius here, weight there). [`ConnectionRule::compose`]
supports that directly: a base template plus a structured override object,
validated eagerly so authoring mistakes surface before any sampling.
*/

use serde::{Deserialize, Serialize};

use crate::distribution::ValueSpec;
use crate::geometry::Mask;
use crate::kernel::Kernel;
use crate::types::{LayerId, TopologyResult};

/// Connection orientation: which side drives the pair enumeration.
///
/// Divergent rules spread from each source element to the targets inside
/// its mask; convergent rules gather into each target element from the
/// sources inside its mask. The mask and kernel always evaluate relative to
/// the driver's position, so the two orientations are not symmetric for
/// unequal layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Convergent,
    Divergent,
}

/// One declarative connection rule between a source and a target layer
/// (which may be the same layer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRule {
    pub source: LayerId,
    pub target: LayerId,
    /// Optional role filter on the source side; `None` matches every role.
    pub source_filter: Option<String>,
    /// Optional role filter on the target side; `None` matches every role.
    pub target_filter: Option<String>,
    pub kind: ConnectionKind,
    pub mask: Mask,
    pub kernel: Kernel,
    /// Signed weight; the sign routes excitatory/inhibitory downstream.
    pub weight: ValueSpec,
    /// Non-negative delay.
    pub delay: ValueSpec,
    /// Synapse-role label carried verbatim on every emitted edge.
    pub synapse_label: String,
}

/// Structured overrides applied on top of a base rule template.
///
/// `None` fields keep the base value. Layer endpoints are deliberately not
/// overridable: a rule template is reused across pathways by pairing it
/// with explicit endpoints at composition time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleOverrides {
    pub source_filter: Option<String>,
    pub target_filter: Option<String>,
    pub kind: Option<ConnectionKind>,
    pub mask: Option<Mask>,
    pub kernel: Option<Kernel>,
    pub weight: Option<ValueSpec>,
    pub delay: Option<ValueSpec>,
    pub synapse_label: Option<String>,
}

impl ConnectionRule {
    /// Validate every configurable part of the rule. Role filters are
    /// checked later, against the actual layers, by the executor.
    pub fn validate(&self) -> TopologyResult<()> {
        self.mask.validate()?;
        self.kernel.validate()?;
        self.weight.validate()?;
        self.delay.validate_non_negative()?;
        Ok(())
    }

    /// Build a rule from a base template and a set of overrides, with
    /// endpoints supplied explicitly. Validates the result eagerly.
    pub fn compose(
        base: &ConnectionRule,
        source: LayerId,
        target: LayerId,
        overrides: RuleOverrides,
    ) -> TopologyResult<ConnectionRule> {
        let rule = ConnectionRule {
            source,
            target,
            source_filter: overrides.source_filter.or_else(|| base.source_filter.clone()),
            target_filter: overrides.target_filter.or_else(|| base.target_filter.clone()),
            kind: overrides.kind.unwrap_or(base.kind),
            mask: overrides.mask.unwrap_or(base.mask),
            kernel: overrides.kernel.unwrap_or(base.kernel),
            weight: overrides.weight.unwrap_or(base.weight),
            delay: overrides.delay.unwrap_or(base.delay),
            synapse_label: overrides
                .synapse_label
                .unwrap_or_else(|| base.synapse_label.clone()),
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Human-readable identification for failure reports: endpoints, role
    /// filters, and orientation.
    pub fn summary(&self, source_name: &str, target_name: &str) -> String {
        let fmt_side = |name: &str, filter: &Option<String>| match filter {
            Some(role) => format!("{name}/{role}"),
            None => name.to_string(),
        };
        format!(
            "{} -> {} ({:?})",
            fmt_side(source_name, &self.source_filter),
            fmt_side(target_name, &self.target_filter),
            self.kind
        )
    }
}
