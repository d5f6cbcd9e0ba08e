// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity Integration Tests

Exercises the full rule pipeline through NetworkBuilder, covering:
- Deterministic fan-out with constant kernels (p=1.0 and p=0.0)
- The nearest-neighbor end-to-end scenario (2x2 layers, radius covering
  only the co-located partner)
- Convergent vs divergent orientation semantics
- Weight/delay resolution (fixed and uniform specs) observed on real edges
- Co-located composition with role filters
- Periodic wrap effects on mask coverage
*/

use neuroweave_topology::{
    ConnectionKind, ConnectionRule, Extent, Kernel, LayerId, LayerSpec, Mask, NetworkBuilder,
    ValueSpec,
};

/// Helper: a rows x columns single-role layer spec with extent sized so that
/// neighboring grid cells are 1.0 apart.
fn grid_spec(name: &str, rows: u32, columns: u32, periodic: bool) -> LayerSpec {
    LayerSpec {
        name: name.into(),
        rows,
        columns,
        extent: Extent::new(columns as f64, rows as f64),
        periodic,
        composition: vec![("A".into(), 1)],
    }
}

/// Helper: base rule with an all-inclusive mask and a deterministic kernel.
fn base_rule(source: LayerId, target: LayerId) -> ConnectionRule {
    ConnectionRule {
        source,
        target,
        source_filter: None,
        target_filter: None,
        kind: ConnectionKind::Divergent,
        mask: Mask::Circular { radius: 100.0 },
        kernel: Kernel::Constant { p: 1.0 },
        weight: ValueSpec::Fixed(1.0),
        delay: ValueSpec::Fixed(1.0),
        synapse_label: "AMPA".into(),
    }
}

// ============================================================================
// Deterministic kernels
// ============================================================================

#[test]
fn test_p1_all_inclusive_connects_every_pair_once() {
    let mut b = NetworkBuilder::with_seed(1);
    let src = b.create_layer(&grid_spec("src", 3, 3, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 2, 2, false)).unwrap();

    let graph = b.apply_rules(&[base_rule(src, dst)]).unwrap();
    assert_eq!(graph.edge_count(), 9 * 4);

    // Exactly once per pair: no duplicates.
    let mut pairs: Vec<_> = graph.edges().map(|e| (e.source, e.target)).collect();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), 36);
}

#[test]
fn test_p0_produces_zero_edges() {
    let mut b = NetworkBuilder::with_seed(1);
    let src = b.create_layer(&grid_spec("src", 4, 4, true)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 4, 4, true)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.kernel = Kernel::Constant { p: 0.0 };
    let graph = b.apply_rules(&[rule]).unwrap();
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_driver_with_no_candidates_is_not_an_error() {
    let mut b = NetworkBuilder::with_seed(1);
    // Layers far apart in mask terms: radius smaller than any pair distance.
    let src = b.create_layer(&grid_spec("src", 2, 2, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 2, 2, false)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.mask = Mask::Rectangular {
        lower_left: (40.0, 40.0),
        upper_right: (41.0, 41.0),
    };
    let graph = b.apply_rules(&[rule]).unwrap();
    assert_eq!(graph.edge_count(), 0);
}

// ============================================================================
// End-to-end nearest-neighbor scenario
// ============================================================================

#[test]
fn test_nearest_neighbor_end_to_end() {
    // Two 2x2 bounded layers; grid cells 1.0 apart, so a radius of 0.5
    // covers only the co-located partner in the other layer.
    let mut b = NetworkBuilder::with_seed(7);
    let src = b.create_layer(&grid_spec("src", 2, 2, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 2, 2, false)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.mask = Mask::Circular { radius: 0.5 };
    rule.weight = ValueSpec::Fixed(3.0);
    rule.delay = ValueSpec::Fixed(1.0);

    let graph = b.apply_rules(&[rule]).unwrap();
    assert_eq!(graph.edge_count(), 4);

    let src_elements = b.lookup(src, None).unwrap();
    let dst_elements = b.lookup(dst, None).unwrap();
    for edge in graph.edges() {
        assert_eq!(edge.weight, 3.0);
        assert_eq!(edge.delay, 1.0);
        assert_eq!(edge.synapse_label, "AMPA");
        // Each source connects to the same-position target.
        let s = src_elements.iter().find(|e| e.id == edge.source).unwrap();
        let t = dst_elements.iter().find(|e| e.id == edge.target).unwrap();
        assert_eq!(s.position, t.position);
    }
}

// ============================================================================
// Convergent vs divergent orientation
// ============================================================================

#[test]
fn test_orientation_flips_edge_direction_for_offset_mask() {
    // A rectangular mask reaching one grid step to the right of the driver.
    // Divergent: targets sit to the right of sources. Convergent: the driver
    // is the target, so sources sit to its right and edges point leftward.
    let mut b = NetworkBuilder::with_seed(3);
    let src = b.create_layer(&grid_spec("src", 1, 2, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 1, 2, false)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.mask = Mask::Rectangular {
        lower_left: (0.5, -0.25),
        upper_right: (1.5, 0.25),
    };

    let divergent = b.apply_rules(&[rule.clone()]).unwrap();
    rule.kind = ConnectionKind::Convergent;
    let convergent = b.apply_rules(&[rule]).unwrap();

    let src_elements = b.lookup(src, None).unwrap();
    let dst_elements = b.lookup(dst, None).unwrap();
    let pos_of = |id| {
        src_elements
            .iter()
            .chain(dst_elements.iter())
            .find(|e| e.id == id)
            .unwrap()
            .position
    };

    assert_eq!(divergent.edge_count(), 1);
    assert_eq!(convergent.edge_count(), 1);
    let d = divergent.edges().next().unwrap();
    let c = convergent.edges().next().unwrap();
    // Divergent edge runs left-to-right, convergent right-to-left.
    assert!(pos_of(d.source).x < pos_of(d.target).x);
    assert!(pos_of(c.source).x > pos_of(c.target).x);
    assert_ne!((d.source, d.target), (c.source, c.target));
}

#[test]
fn test_orientation_changes_realized_graph_for_stochastic_kernel() {
    // With a stochastic kernel the two orientations consume the RNG stream
    // differently, so the realized edge sets diverge for a fixed seed even
    // though their statistics match.
    let mut b = NetworkBuilder::with_seed(11);
    let src = b.create_layer(&grid_spec("src", 2, 2, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 4, 4, false)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.kernel = Kernel::Gaussian {
        p_center: 0.5,
        sigma: 1.0,
    };

    let divergent = b.apply_rules(&[rule.clone()]).unwrap();
    rule.kind = ConnectionKind::Convergent;
    let convergent = b.apply_rules(&[rule]).unwrap();

    let set = |g: &neuroweave_topology::Graph| {
        let mut v: Vec<_> = g.edges().map(|e| (e.source, e.target)).collect();
        v.sort();
        v
    };
    assert_ne!(set(&divergent), set(&convergent));
}

// ============================================================================
// Weight and delay resolution
// ============================================================================

#[test]
fn test_uniform_specs_resolved_per_edge() {
    let mut b = NetworkBuilder::with_seed(13);
    let src = b.create_layer(&grid_spec("src", 4, 4, true)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 4, 4, true)).unwrap();

    let mut rule = base_rule(src, dst);
    rule.weight = ValueSpec::Uniform { min: -2.0, max: -1.0 };
    rule.delay = ValueSpec::Uniform {
        min: 1.75,
        max: 2.25,
    };

    let graph = b.apply_rules(&[rule]).unwrap();
    assert_eq!(graph.edge_count(), 256);

    let mut weight_sum = 0.0;
    let mut delay_sum = 0.0;
    let mut distinct_delays = std::collections::BTreeSet::new();
    for edge in graph.edges() {
        assert!((-2.0..=-1.0).contains(&edge.weight));
        assert!((1.75..=2.25).contains(&edge.delay));
        weight_sum += edge.weight;
        delay_sum += edge.delay;
        distinct_delays.insert(edge.delay.to_bits());
    }
    let n = graph.edge_count() as f64;
    assert!((weight_sum / n - -1.5).abs() < 0.05);
    assert!((delay_sum / n - 2.0).abs() < 0.05);
    // Independent per-edge draws, not one shared sample.
    assert!(distinct_delays.len() > 200);
}

// ============================================================================
// Co-located elements and role filters
// ============================================================================

#[test]
fn test_role_filters_never_select_other_roles() {
    let mut b = NetworkBuilder::with_seed(17);
    let spec = LayerSpec {
        name: "Vp".into(),
        rows: 1,
        columns: 1,
        extent: Extent::new(1.0, 1.0),
        periodic: false,
        composition: vec![("A".into(), 2), ("B".into(), 1)],
    };
    let layer = b.create_layer(&spec).unwrap();
    assert_eq!(b.lookup(layer, None).unwrap().len(), 3);

    let mut rule = base_rule(layer, layer);
    rule.source_filter = Some("A".into());
    rule.target_filter = Some("A".into());

    let graph = b.apply_rules(&[rule]).unwrap();
    // Both A elements drive both A candidates (self-pairs included: the
    // engine performs no implicit self-loop suppression).
    assert_eq!(graph.edge_count(), 4);

    let b_ids: Vec<_> = b
        .lookup(layer, Some("B"))
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    for edge in graph.edges() {
        assert!(!b_ids.contains(&edge.source));
        assert!(!b_ids.contains(&edge.target));
    }
}

#[test]
fn test_parallel_edges_across_rules_are_preserved() {
    let mut b = NetworkBuilder::with_seed(19);
    let src = b.create_layer(&grid_spec("src", 1, 1, false)).unwrap();
    let dst = b.create_layer(&grid_spec("dst", 1, 1, false)).unwrap();

    let rule = base_rule(src, dst);
    let graph = b.apply_rules(&[rule.clone(), rule]).unwrap();
    // Two passes of the same rule: two parallel edges, modeling independent
    // synaptic contacts.
    assert_eq!(graph.edge_count(), 2);
    let pairs: Vec<_> = graph.edges().map(|e| (e.source, e.target)).collect();
    assert_eq!(pairs[0], pairs[1]);
    assert_eq!(graph.batches().len(), 2);
}

// ============================================================================
// Periodic geometry
// ============================================================================

#[test]
fn test_wrap_extends_mask_across_boundary() {
    // 1x4 layer, cells 1.0 apart. Bounded: the leftmost element reaches only
    // its immediate right neighbor with radius 1.0. Periodic: it also
    // reaches the rightmost element across the wrap.
    let mut rule_counts = Vec::new();
    for periodic in [false, true] {
        let mut b = NetworkBuilder::with_seed(23);
        let layer = b.create_layer(&grid_spec("ring", 1, 4, periodic)).unwrap();

        let mut rule = base_rule(layer, layer);
        rule.mask = Mask::Circular { radius: 1.0 };
        let graph = b.apply_rules(&[rule]).unwrap();

        let leftmost = b.lookup(layer, None).unwrap()[0].id;
        let fanout = graph
            .edges()
            .filter(|e| e.source == leftmost && e.target != leftmost)
            .count();
        rule_counts.push(fanout);
    }
    assert_eq!(rule_counts, vec![1, 2]);
}
