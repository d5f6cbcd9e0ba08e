// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Builds a small early-visual-pathway network: a retina layer driving a
//! thalamic layer, plus intra-cortical wiring composed from a shared rule
//! template. Prints per-rule edge counts.

use neuroweave_topology::{
    ConnectionKind, ConnectionRule, Extent, Kernel, LayerSpec, Mask, NetworkBuilder, RuleOverrides,
    TopologyResult, ValueSpec,
};

fn main() -> TopologyResult<()> {
    let n = 20;
    let vis_size = 8.0;
    // Connection lengths in the model are given in grid steps; scale them
    // into degrees the same way the layer extents are defined.
    let dpc = vis_size / (n as f64 - 1.0);

    let mut builder = NetworkBuilder::with_seed(0xFEED);

    let retina = builder.create_layer(&LayerSpec {
        name: "retina".into(),
        rows: n,
        columns: n,
        extent: Extent::new(vis_size, vis_size),
        periodic: true,
        composition: vec![("RetinaNode".into(), 1)],
    })?;

    let thalamus = builder.create_layer(&LayerSpec {
        name: "Tp".into(),
        rows: n,
        columns: n,
        extent: Extent::new(vis_size, vis_size),
        periodic: true,
        composition: vec![("TpRelay".into(), 1), ("TpInter".into(), 1)],
    })?;

    let cortex = builder.create_layer(&LayerSpec {
        name: "Vp".into(),
        rows: n,
        columns: n,
        extent: Extent::new(vis_size, vis_size),
        periodic: true,
        composition: vec![
            ("L23pyr".into(), 2),
            ("L23in".into(), 1),
            ("L4pyr".into(), 2),
            ("L4in".into(), 1),
        ],
    })?;

    // Drifting-grating phase per retinal node.
    let lambda: f64 = 2.0;
    let failures = builder.apply_initializer(retina, |pos| Ok(360.0 / lambda * pos.x))?;
    assert!(failures.is_empty());

    // Retino-thalamic drive.
    let ret_thal = ConnectionRule {
        source: retina,
        target: thalamus,
        source_filter: None,
        target_filter: Some("TpRelay".into()),
        kind: ConnectionKind::Divergent,
        mask: Mask::Circular { radius: 1.0 * dpc },
        kernel: Kernel::Gaussian {
            p_center: 0.75,
            sigma: 2.5 * dpc,
        },
        weight: ValueSpec::Fixed(10.0),
        delay: ValueSpec::Fixed(1.0),
        synapse_label: "AMPA".into(),
    };

    // Intra-cortical template, varied per pathway through overrides.
    let hor_intra = ConnectionRule {
        source: cortex,
        target: cortex,
        source_filter: Some("L23pyr".into()),
        target_filter: Some("L23pyr".into()),
        kind: ConnectionKind::Divergent,
        mask: Mask::Circular { radius: 12.0 * dpc },
        kernel: Kernel::Gaussian {
            p_center: 0.05,
            sigma: 7.5 * dpc,
        },
        weight: ValueSpec::Fixed(1.0),
        delay: ValueSpec::Uniform {
            min: 1.75,
            max: 2.25,
        },
        synapse_label: "AMPA".into(),
    };

    let mut rules = vec![ret_thal, hor_intra.clone()];
    rules.push(ConnectionRule::compose(
        &hor_intra,
        cortex,
        cortex,
        RuleOverrides {
            target_filter: Some("L23in".into()),
            ..Default::default()
        },
    )?);
    rules.push(ConnectionRule::compose(
        &hor_intra,
        cortex,
        cortex,
        RuleOverrides {
            source_filter: Some("L4pyr".into()),
            target_filter: Some("L4pyr".into()),
            mask: Some(Mask::Circular { radius: 7.0 * dpc }),
            ..Default::default()
        },
    )?);
    // Thalamo-cortical gathering into L4 pyramidal cells.
    rules.push(ConnectionRule {
        source: thalamus,
        target: cortex,
        source_filter: Some("TpRelay".into()),
        target_filter: Some("L4pyr".into()),
        kind: ConnectionKind::Convergent,
        mask: Mask::Rectangular {
            lower_left: (-4.0 * dpc, -1.0 * dpc),
            upper_right: (4.0 * dpc, 1.0 * dpc),
        },
        kernel: Kernel::Constant { p: 0.5 },
        weight: ValueSpec::Fixed(5.0),
        delay: ValueSpec::Uniform {
            min: 2.75,
            max: 3.25,
        },
        synapse_label: "AMPA".into(),
    });

    let graph = builder.apply_rules(&rules)?;
    for batch in graph.batches() {
        let rule = &rules[batch.rule_index];
        println!(
            "rule {}: {} -> {} edges",
            batch.rule_index,
            rule.summary(
                builder.layer(rule.source)?.name(),
                builder.layer(rule.target)?.name()
            ),
            batch.edges.len()
        );
    }
    println!("total: {} edges", graph.edge_count());
    Ok(())
}
