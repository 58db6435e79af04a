//! CSV rendering of result histories.
//!
//! One row per entity per timestep; times render as `HH:MM` from the
//! seconds offset, numerics at 4 decimal places, missing quality as `0`.

use std::fmt::Write as _;

use wn_core::ClockTime;

use crate::types::ResultSnapshot;

pub const NODE_HEADER: &str = "Time,ID,Demand,Head,Pressure,Quality";
pub const LINK_HEADER: &str = "Time,ID,Status,Flow,Velocity,Headloss,Quality";

/// Node results for every timestep of a run. A single snapshot is just a
/// one-element history.
pub fn node_history_csv(history: &[ResultSnapshot]) -> String {
    let mut out = String::from(NODE_HEADER);
    out.push('\n');
    for snapshot in history {
        let time = ClockTime::from_seconds(snapshot.time_s);
        for node in &snapshot.nodes {
            let _ = writeln!(
                out,
                "{time},{},{},{},{},{}",
                node.id,
                num(node.demand),
                num(node.head),
                num(node.pressure),
                quality(node.quality),
            );
        }
    }
    out
}

/// Link results for every timestep of a run.
pub fn link_history_csv(history: &[ResultSnapshot]) -> String {
    let mut out = String::from(LINK_HEADER);
    out.push('\n');
    for snapshot in history {
        let time = ClockTime::from_seconds(snapshot.time_s);
        for link in &snapshot.links {
            let _ = writeln!(
                out,
                "{time},{},{},{},{},{},{}",
                link.id,
                link.status,
                num(link.flow),
                num(link.velocity),
                num(link.headloss),
                quality(link.quality),
            );
        }
    }
    out
}

fn num(v: f64) -> String {
    format!("{v:.4}")
}

fn quality(q: Option<f64>) -> String {
    match q {
        Some(v) => num(v),
        None => "0".to_string(),
    }
}
