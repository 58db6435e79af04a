//! Integration tests for wn-graph.

use geo::{Point, line_string};
use proptest::prelude::*;
use wn_graph::{Finding, NetworkGraph, validate};
use wn_model::{FeatureGeometry, FeatureKind, LinkStatus, NetworkFeature};

fn junction(id: &str, x: f64, y: f64) -> NetworkFeature {
    NetworkFeature {
        id: id.to_string(),
        kind: FeatureKind::Junction {
            elevation: Some(10.0),
            demand: Some(0.2),
            pattern: None,
        },
        geometry: FeatureGeometry::Point {
            point: Point::new(x, y),
        },
    }
}

fn pipe(id: &str, start: &str, end: &str, x0: f64, x1: f64) -> NetworkFeature {
    NetworkFeature {
        id: id.to_string(),
        kind: FeatureKind::Pipe {
            start_node_id: start.to_string(),
            end_node_id: end.to_string(),
            length: None,
            diameter: Some(150.0),
            roughness: Some(110.0),
            status: LinkStatus::Open,
            check_valve: false,
        },
        geometry: FeatureGeometry::Polyline {
            line: line_string![(x: x0, y: 0.0), (x: x1, y: 0.0)],
        },
    }
}

#[test]
fn tank_fed_network_round_trip() {
    let tank = NetworkFeature {
        id: "T1".to_string(),
        kind: FeatureKind::Tank {
            elevation: Some(80.0),
            init_level: 4.0,
            min_level: 1.0,
            max_level: 7.0,
            diameter: 15.0,
            min_volume: None,
        },
        geometry: FeatureGeometry::Point {
            point: Point::new(0.0, 0.0),
        },
    };
    let features = vec![
        tank,
        junction("J1", 100.0, 0.0),
        junction("J2", 200.0, 0.0),
        pipe("P1", "T1", "J1", 0.0, 100.0),
        pipe("P2", "J1", "J2", 100.0, 200.0),
    ];

    let graph = NetworkGraph::from_features(&features);
    assert_eq!(graph.nodes().len(), 3);
    assert_eq!(graph.links().len(), 2);
    assert_eq!(graph.node("J1").unwrap().connected_links, vec!["P1", "P2"]);

    let report = validate(&graph, &[], &[], &[]);
    assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
}

#[test]
fn report_order_is_stable_across_checks() {
    // One defect of each class; errors come out grouped by check order
    let features = vec![
        junction("J1", 0.0, 0.0),
        junction("J1", 1.0, 0.0),
        junction("LONER", 2.0, 0.0),
        pipe("P1", "J1", "GONE", 0.0, 5.0),
    ];
    let graph = NetworkGraph::from_features(&features);
    let report = validate(&graph, &[], &[], &[]);

    assert_eq!(
        report.errors,
        vec![
            Finding::DuplicateId {
                id: "J1".to_string()
            },
            Finding::DanglingEndpoint {
                link_id: "P1".to_string(),
                node_id: "GONE".to_string()
            },
        ]
    );
    assert_eq!(
        report.warnings,
        vec![Finding::IsolatedNode {
            node_id: "LONER".to_string()
        }]
    );
}

proptest! {
    /// Chains of junctions with occasional breaks: validation twice over
    /// the same snapshot is byte-identical, and errors only appear when a
    /// reference is actually broken.
    #[test]
    fn validation_is_idempotent_over_random_chains(
        n in 1usize..8,
        broken in proptest::bool::ANY,
    ) {
        let mut features = Vec::new();
        for i in 0..n {
            features.push(junction(&format!("J{i}"), i as f64 * 10.0, 0.0));
        }
        for i in 1..n {
            let end = if broken && i == n - 1 {
                "MISSING".to_string()
            } else {
                format!("J{i}")
            };
            features.push(pipe(
                &format!("P{i}"),
                &format!("J{}", i - 1),
                &end,
                (i - 1) as f64 * 10.0,
                i as f64 * 10.0,
            ));
        }

        let graph = NetworkGraph::from_features(&features);
        let first = validate(&graph, &[], &[], &[]);
        let second = validate(&graph, &[], &[], &[]);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_valid(), !(broken && n > 1));
    }
}
