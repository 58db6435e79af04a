//! wn-results: rendering of solver output and network geometry into
//! reporting formats.
//!
//! The solver returns per-timestep snapshots of node and link state;
//! this crate turns them into tabular CSV and turns the network itself
//! into a GeoJSON FeatureCollection. Everything here is a pure function
//! over caller-supplied data; nothing is persisted.

pub mod csv;
pub mod geojson;
pub mod types;

pub use csv::{link_history_csv, node_history_csv};
pub use geojson::network_geojson;
pub use types::{LinkResult, NodeResult, ResultSnapshot};
