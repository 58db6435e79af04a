//! Solver output snapshot types.

use serde::{Deserialize, Serialize};

/// Node state at one timestep. Quality is absent when the run had no
/// water-quality analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeResult {
    pub id: String,
    pub demand: f64,
    pub head: f64,
    pub pressure: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

/// Link state at one timestep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkResult {
    pub id: String,
    pub status: String,
    pub flow: f64,
    pub velocity: f64,
    pub headloss: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
}

/// One timestep of solver output, keyed by the seconds offset from the
/// start of the simulation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSnapshot {
    pub time_s: u64,
    #[serde(default)]
    pub nodes: Vec<NodeResult>,
    #[serde(default)]
    pub links: Vec<LinkResult>,
}
