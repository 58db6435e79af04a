//! wn-graph: network graph layer for waternet.
//!
//! Provides:
//! - `NetworkGraph`: a typed node/link graph derived from a feature
//!   snapshot, with resolved endpoints and recomputed adjacency
//! - the topology validator, which reports structural defects as data
//!
//! The graph is rebuilt on demand from the current feature snapshot and
//! owns no state of its own; building never fails, so a half-edited
//! network can still be inspected and reported on.

pub mod builder;
pub mod graph;
pub mod validate;

pub use graph::{GraphLink, GraphNode, NetworkGraph, NodeKind};
pub use validate::{Finding, Severity, ValidationReport, validate};
