//! Graph construction from a feature snapshot.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use geo::{EuclideanLength, LineString, Point};
use wn_model::{FeatureKind, NetworkFeature};

use crate::graph::{GraphLink, GraphNode, NetworkGraph, NodeKind};

impl NetworkGraph {
    /// Derive a graph from the current feature snapshot.
    ///
    /// Never fails: links whose endpoints don't resolve are retained with
    /// `resolved = false`, and duplicate ids are recorded rather than
    /// rejected, so the validator can report on exactly what the editor
    /// holds.
    pub fn from_features(features: &[NetworkFeature]) -> Self {
        let mut graph = NetworkGraph::default();
        let mut id_counts: HashMap<&str, u32> = HashMap::new();

        for feature in features {
            let count = id_counts.entry(&feature.id).or_insert(0);
            *count += 1;
            if *count == 2 {
                graph.duplicate_ids.push(feature.id.clone());
            }

            if feature.is_node() {
                let index = graph.nodes.len();
                graph.nodes.push(node_from_feature(feature));
                if let Entry::Vacant(slot) = graph.node_index.entry(feature.id.clone()) {
                    slot.insert(index);
                }
            } else {
                let index = graph.links.len();
                graph.links.push(link_from_feature(feature));
                if let Entry::Vacant(slot) = graph.link_index.entry(feature.id.clone()) {
                    slot.insert(index);
                }
            }
        }

        // Resolve endpoints against the full node set
        for link in &mut graph.links {
            link.resolved = graph.node_index.contains_key(&link.start_node_id)
                && graph.node_index.contains_key(&link.end_node_id);
        }

        // Recompute adjacency from the link set; this is the only
        // authoritative source for connected_links
        for link in &graph.links {
            for endpoint in [&link.start_node_id, &link.end_node_id] {
                if let Some(&node_idx) = graph.node_index.get(endpoint) {
                    let incident = &mut graph.nodes[node_idx].connected_links;
                    if !incident.contains(&link.id) {
                        incident.push(link.id.clone());
                    }
                }
            }
        }

        graph
    }
}

fn node_from_feature(feature: &NetworkFeature) -> GraphNode {
    let kind = match feature.kind {
        FeatureKind::Junction { .. } => NodeKind::Junction,
        FeatureKind::Tank { .. } => NodeKind::Tank,
        _ => NodeKind::Reservoir,
    };
    GraphNode {
        id: feature.id.clone(),
        kind,
        props: feature.kind.clone(),
        location: feature.point().unwrap_or_else(|| Point::new(0.0, 0.0)),
        connected_links: Vec::new(),
    }
}

fn link_from_feature(feature: &NetworkFeature) -> GraphLink {
    let geometry = feature
        .polyline()
        .cloned()
        .unwrap_or_else(|| LineString::new(Vec::new()));

    let explicit_length = match feature.kind {
        FeatureKind::Pipe { length, .. } => length,
        _ => None,
    };
    let length = explicit_length.unwrap_or_else(|| geometry.euclidean_length());

    let (start_node_id, end_node_id) = feature
        .endpoints()
        .map(|(s, e)| (s.to_string(), e.to_string()))
        .unwrap_or_default();

    GraphLink {
        id: feature.id.clone(),
        props: feature.kind.clone(),
        geometry,
        start_node_id,
        end_node_id,
        resolved: false,
        length,
        zero_length_device: feature.is_zero_length_device(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;
    use wn_model::{FeatureGeometry, LinkStatus};

    fn junction(id: &str, x: f64, y: f64) -> NetworkFeature {
        NetworkFeature {
            id: id.to_string(),
            kind: FeatureKind::Junction {
                elevation: Some(100.0),
                demand: None,
                pattern: None,
            },
            geometry: FeatureGeometry::Point {
                point: Point::new(x, y),
            },
        }
    }

    fn pipe(id: &str, start: &str, end: &str, line: LineString<f64>) -> NetworkFeature {
        NetworkFeature {
            id: id.to_string(),
            kind: FeatureKind::Pipe {
                start_node_id: start.to_string(),
                end_node_id: end.to_string(),
                length: None,
                diameter: Some(100.0),
                roughness: None,
                status: LinkStatus::Open,
                check_valve: false,
            },
            geometry: FeatureGeometry::Polyline { line },
        }
    }

    #[test]
    fn build_resolves_endpoints_and_adjacency() {
        let features = vec![
            junction("J1", 0.0, 0.0),
            junction("J2", 3.0, 4.0),
            pipe("P1", "J1", "J2", line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)]),
        ];
        let graph = NetworkGraph::from_features(&features);

        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.links().len(), 1);

        let link = graph.link("P1").unwrap();
        assert!(link.resolved);
        assert!((link.length - 5.0).abs() < 1e-12);

        assert_eq!(graph.node("J1").unwrap().connected_links, vec!["P1"]);
        assert_eq!(graph.node("J2").unwrap().connected_links, vec!["P1"]);
    }

    #[test]
    fn unresolved_link_is_retained() {
        let features = vec![
            junction("J1", 0.0, 0.0),
            pipe("P1", "J1", "J99", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]),
        ];
        let graph = NetworkGraph::from_features(&features);

        let link = graph.link("P1").unwrap();
        assert!(!link.resolved);
        // The resolvable endpoint still gets adjacency
        assert_eq!(graph.node("J1").unwrap().connected_links, vec!["P1"]);
    }

    #[test]
    fn explicit_length_overrides_geometry() {
        let mut feature = pipe(
            "P1",
            "J1",
            "J2",
            line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)],
        );
        if let FeatureKind::Pipe { length, .. } = &mut feature.kind {
            *length = Some(42.0);
        }
        let features = vec![junction("J1", 0.0, 0.0), junction("J2", 3.0, 4.0), feature];
        let graph = NetworkGraph::from_features(&features);
        assert_eq!(graph.link("P1").unwrap().length, 42.0);
    }

    #[test]
    fn duplicate_ids_are_recorded_once_each() {
        let features = vec![
            junction("J1", 0.0, 0.0),
            junction("J1", 1.0, 1.0),
            junction("J1", 2.0, 2.0),
            junction("J2", 3.0, 3.0),
        ];
        let graph = NetworkGraph::from_features(&features);
        assert_eq!(graph.duplicate_ids(), &["J1".to_string()]);
        assert_eq!(graph.nodes().len(), 4);
        // Lookup resolves to the first occurrence
        assert_eq!(graph.node("J1").unwrap().location, Point::new(0.0, 0.0));
    }

    #[test]
    fn build_is_order_stable() {
        let features = vec![
            junction("J1", 0.0, 0.0),
            junction("J2", 1.0, 0.0),
            pipe("P1", "J1", "J2", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)]),
        ];
        let a = NetworkGraph::from_features(&features);
        let b = NetworkGraph::from_features(&features);
        assert_eq!(a, b);

        let ids: Vec<_> = a.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["J1", "J2"]);
    }
}
