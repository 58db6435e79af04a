//! Topology validation.
//!
//! Structural defects are the expected output here, not failures: the
//! validator always runs to completion and returns every finding as
//! data. Check order is fixed (duplicates, dangling endpoints, isolated
//! nodes, disconnected components, geometry, attributes, hydraulic
//! references) so two runs over the same snapshot produce byte-identical
//! reports.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use wn_core::LENGTH_EPSILON;
use wn_model::{FeatureKind, NetworkControl, PumpCurve, TimePattern};

use crate::graph::NetworkGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One structural defect discovered by the validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    /// Same id used by more than one feature.
    DuplicateId { id: String },

    /// Link endpoint that does not resolve to a node.
    DanglingEndpoint { link_id: String, node_id: String },

    /// Node with no incident links.
    IsolatedNode { node_id: String },

    /// Connected component beyond the first, among linked nodes.
    DisconnectedComponent { member_ids: Vec<String> },

    /// Pipe whose effective length is (near) zero or non-finite.
    DegenerateGeometry { link_id: String },

    /// Feature missing an attribute the export needs.
    MissingAttribute {
        feature_id: String,
        attribute: &'static str,
    },

    /// Control targeting a link that does not exist.
    UnknownControlLink { link_id: String },

    /// Level control referencing a node that does not exist.
    UnknownControlNode { node_id: String },

    /// Pump referencing a head curve that does not exist.
    UnknownHeadCurve { pump_id: String, curve_id: String },

    /// Curve with no points.
    EmptyCurve { curve_id: String },

    /// Volume/headloss curve whose x values do not increase.
    NonMonotonicCurve { curve_id: String },

    /// Feature referencing a demand pattern that does not exist.
    UnknownPattern {
        feature_id: String,
        pattern_id: String,
    },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::DuplicateId { .. }
            | Finding::DanglingEndpoint { .. }
            | Finding::UnknownControlLink { .. }
            | Finding::UnknownControlNode { .. }
            | Finding::UnknownHeadCurve { .. }
            | Finding::EmptyCurve { .. }
            | Finding::NonMonotonicCurve { .. } => Severity::Error,

            Finding::IsolatedNode { .. }
            | Finding::DisconnectedComponent { .. }
            | Finding::DegenerateGeometry { .. }
            | Finding::MissingAttribute { .. }
            | Finding::UnknownPattern { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::DuplicateId { id } => write!(f, "Duplicate identifier '{id}'"),
            Finding::DanglingEndpoint { link_id, node_id } => {
                write!(f, "Link '{link_id}' references missing node '{node_id}'")
            }
            Finding::IsolatedNode { node_id } => {
                write!(f, "Node '{node_id}' has no connected links")
            }
            Finding::DisconnectedComponent { member_ids } => {
                write!(
                    f,
                    "Disconnected component: {}",
                    member_ids.join(", ")
                )
            }
            Finding::DegenerateGeometry { link_id } => {
                write!(f, "Link '{link_id}' has (near) zero length")
            }
            Finding::MissingAttribute {
                feature_id,
                attribute,
            } => write!(f, "Feature '{feature_id}' is missing {attribute}"),
            Finding::UnknownControlLink { link_id } => {
                write!(f, "Control targets unknown link '{link_id}'")
            }
            Finding::UnknownControlNode { node_id } => {
                write!(f, "Control references unknown node '{node_id}'")
            }
            Finding::UnknownHeadCurve { pump_id, curve_id } => {
                write!(f, "Pump '{pump_id}' references unknown curve '{curve_id}'")
            }
            Finding::EmptyCurve { curve_id } => write!(f, "Curve '{curve_id}' has no points"),
            Finding::NonMonotonicCurve { curve_id } => {
                write!(f, "Curve '{curve_id}' x values must increase")
            }
            Finding::UnknownPattern {
                feature_id,
                pattern_id,
            } => write!(
                f,
                "Feature '{feature_id}' references unknown pattern '{pattern_id}'"
            ),
        }
    }
}

/// Full validation outcome. Warnings never affect validity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }
}

/// Run every structural check over the graph and its hydraulic tables.
pub fn validate(
    graph: &NetworkGraph,
    patterns: &[TimePattern],
    curves: &[PumpCurve],
    controls: &[NetworkControl],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_duplicates(graph, &mut report);
    check_dangling(graph, &mut report);
    check_isolated(graph, &mut report);
    check_connectivity(graph, &mut report);
    check_geometry(graph, &mut report);
    check_attributes(graph, &mut report);
    check_hydraulics(graph, patterns, curves, controls, &mut report);

    report
}

fn check_duplicates(graph: &NetworkGraph, report: &mut ValidationReport) {
    for id in graph.duplicate_ids() {
        report.push(Finding::DuplicateId { id: id.clone() });
    }
}

fn check_dangling(graph: &NetworkGraph, report: &mut ValidationReport) {
    for link in graph.links() {
        for endpoint in [&link.start_node_id, &link.end_node_id] {
            if !graph.has_node(endpoint) {
                report.push(Finding::DanglingEndpoint {
                    link_id: link.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}

fn check_isolated(graph: &NetworkGraph, report: &mut ValidationReport) {
    for (index, node) in graph.nodes().iter().enumerate() {
        if graph.is_primary_node(index) && node.connected_links.is_empty() {
            report.push(Finding::IsolatedNode {
                node_id: node.id.clone(),
            });
        }
    }
}

/// Breadth-first traversal over undirected resolved links. Only nodes
/// incident to at least one resolved link take part; zero-link nodes are
/// already covered by the isolated-node warning, and half-dangling links
/// are not edges.
fn check_connectivity(graph: &NetworkGraph, report: &mut ValidationReport) {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut first_component_seen = false;

    let linked: Vec<&str> = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(index, node)| {
            graph.is_primary_node(*index)
                && node
                    .connected_links
                    .iter()
                    .any(|l| graph.link(l).is_some_and(|link| link.resolved))
        })
        .map(|(_, node)| node.id.as_str())
        .collect();

    for &start in &linked {
        if visited.contains(start) {
            continue;
        }

        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            members.push(current.to_string());
            let Some(node) = graph.node(current) else {
                continue;
            };
            for link_id in &node.connected_links {
                let Some(link) = graph.link(link_id) else {
                    continue;
                };
                if !link.resolved {
                    continue;
                }
                for neighbor in [&link.start_node_id, &link.end_node_id] {
                    if neighbor != current && visited.insert(neighbor) {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        if first_component_seen {
            report.push(Finding::DisconnectedComponent {
                member_ids: members,
            });
        }
        first_component_seen = true;
    }
}

fn check_geometry(graph: &NetworkGraph, report: &mut ValidationReport) {
    for link in graph.links() {
        if link.zero_length_device {
            continue;
        }
        if !link.length.is_finite() || link.length.abs() < LENGTH_EPSILON {
            report.push(Finding::DegenerateGeometry {
                link_id: link.id.clone(),
            });
        }
    }
}

fn check_attributes(graph: &NetworkGraph, report: &mut ValidationReport) {
    for (index, node) in graph.nodes().iter().enumerate() {
        if !graph.is_primary_node(index) {
            continue;
        }
        match &node.props {
            FeatureKind::Junction {
                elevation: None, ..
            }
            | FeatureKind::Tank {
                elevation: None, ..
            } => {
                report.push(Finding::MissingAttribute {
                    feature_id: node.id.clone(),
                    attribute: "elevation",
                });
            }
            FeatureKind::Reservoir { head: None, .. } => {
                report.push(Finding::MissingAttribute {
                    feature_id: node.id.clone(),
                    attribute: "head",
                });
            }
            _ => {}
        }
    }

    for link in graph.links() {
        match &link.props {
            FeatureKind::Pipe { diameter: None, .. }
            | FeatureKind::Valve { diameter: None, .. } => {
                report.push(Finding::MissingAttribute {
                    feature_id: link.id.clone(),
                    attribute: "diameter",
                });
            }
            FeatureKind::Pump {
                head_curve: None,
                power: None,
                ..
            } => {
                report.push(Finding::MissingAttribute {
                    feature_id: link.id.clone(),
                    attribute: "head curve or power",
                });
            }
            _ => {}
        }
    }
}

fn check_hydraulics(
    graph: &NetworkGraph,
    patterns: &[TimePattern],
    curves: &[PumpCurve],
    controls: &[NetworkControl],
    report: &mut ValidationReport,
) {
    for control in controls {
        if !graph.has_link(&control.link_id) {
            report.push(Finding::UnknownControlLink {
                link_id: control.link_id.clone(),
            });
        }
        if let Some(node_id) = control.trigger_node()
            && !graph.has_node(node_id)
        {
            report.push(Finding::UnknownControlNode {
                node_id: node_id.to_string(),
            });
        }
    }

    let curve_ids: HashSet<&str> = curves.iter().map(|c| c.id.as_str()).collect();
    for link in graph.links() {
        if let FeatureKind::Pump {
            head_curve: Some(curve_id),
            ..
        } = &link.props
            && !curve_ids.contains(curve_id.as_str())
        {
            report.push(Finding::UnknownHeadCurve {
                pump_id: link.id.clone(),
                curve_id: curve_id.clone(),
            });
        }
    }

    for curve in curves {
        if curve.points.is_empty() {
            report.push(Finding::EmptyCurve {
                curve_id: curve.id.clone(),
            });
        } else if curve.requires_monotonic_x() && !curve.is_monotonic_x() {
            report.push(Finding::NonMonotonicCurve {
                curve_id: curve.id.clone(),
            });
        }
    }

    let pattern_ids: HashSet<&str> = patterns.iter().map(|p| p.id.as_str()).collect();
    for node in graph.nodes() {
        let referenced = match &node.props {
            FeatureKind::Junction { pattern, .. } | FeatureKind::Reservoir { pattern, .. } => {
                pattern.as_deref()
            }
            _ => None,
        };
        if let Some(pattern_id) = referenced
            && !pattern_ids.contains(pattern_id)
        {
            report.push(Finding::UnknownPattern {
                feature_id: node.id.clone(),
                pattern_id: pattern_id.to_string(),
            });
        }
    }
}
