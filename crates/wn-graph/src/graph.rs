//! Core graph data structures.

use std::collections::HashMap;

use geo::{LineString, Point};
use wn_model::FeatureKind;

/// Node flavor; every link endpoint must resolve to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Junction,
    Tank,
    Reservoir,
}

/// A point element of the network with its recomputed adjacency.
///
/// `connected_links` is derived from the link set on every build; any
/// adjacency stored on the input features is ignored (it may be stale).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    pub props: FeatureKind,
    pub location: Point<f64>,
    pub connected_links: Vec<String>,
}

/// An edge element with resolved endpoints and an effective length.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphLink {
    pub id: String,
    pub props: FeatureKind,
    pub geometry: LineString<f64>,
    pub start_node_id: String,
    pub end_node_id: String,
    /// Both endpoints refer to existing nodes.
    pub resolved: bool,
    /// Explicit length override when the feature carries one, else the
    /// planar length of the geometry.
    pub length: f64,
    /// Pumps and valves sit in-line with no extent of their own; zero
    /// length is expected for them.
    pub zero_length_device: bool,
}

/// A derived, read-only view of the network topology.
///
/// Iteration order over nodes and links is the insertion order of the
/// input snapshot, so downstream output is reproducible. Lookup by id
/// resolves to the first occurrence; later duplicates stay in the lists
/// for the validator to report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) links: Vec<GraphLink>,
    pub(crate) node_index: HashMap<String, usize>,
    pub(crate) link_index: HashMap<String, usize>,
    /// Ids used by more than one feature, in first-seen order.
    pub(crate) duplicate_ids: Vec<String>,
}

impl NetworkGraph {
    /// All nodes in input order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All links in input order.
    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// First link with the given id.
    pub fn link(&self, id: &str) -> Option<&GraphLink> {
        self.link_index.get(id).map(|&i| &self.links[i])
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn has_link(&self, id: &str) -> bool {
        self.link_index.contains_key(id)
    }

    /// Ids appearing on more than one feature.
    pub fn duplicate_ids(&self) -> &[String] {
        &self.duplicate_ids
    }

    /// Whether the node at `index` is the authoritative entry for its id
    /// (false for later duplicates).
    pub(crate) fn is_primary_node(&self, index: usize) -> bool {
        self.node_index.get(&self.nodes[index].id) == Some(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_accessors() {
        let graph = NetworkGraph::default();
        assert!(graph.nodes().is_empty());
        assert!(graph.links().is_empty());
        assert!(graph.node("J1").is_none());
        assert!(!graph.has_link("P1"));
        assert!(graph.duplicate_ids().is_empty());
    }
}
