//! Section-by-section INP text assembly.
//!
//! The output is consumed by an external solver that is strict about
//! section order and token placement, so every section is emitted in a
//! fixed order (with its header even when empty), numerics render at 4
//! decimal places, and geographic coordinates at 6. Export fails only
//! when a link endpoint cannot be resolved; validator warnings never
//! block it.

use wn_geo::{Projection, projection_for};
use wn_graph::{GraphLink, GraphNode, NetworkGraph};
use wn_model::{
    ControlAction, ControlTrigger, FeatureKind, LinkStatus, NetworkControl, ProjectSettings,
    PumpCurve, TimePattern,
};

use crate::{InpError, InpResult};

/// Column width for tabular sections.
const COL: usize = 16;
/// Key column width for [OPTIONS]/[TIMES].
const KEY_COL: usize = 20;
/// Pattern multipliers per line.
const PATTERN_WRAP: usize = 6;
/// Diameter fallback (mm or in, per unit system) when a link carries none.
const DEFAULT_DIAMETER: f64 = 100.0;

/// Render the network and its hydraulic settings as solver input text.
pub fn write_inp(
    graph: &NetworkGraph,
    settings: &ProjectSettings,
    patterns: &[TimePattern],
    curves: &[PumpCurve],
    controls: &[NetworkControl],
) -> InpResult<String> {
    // A dangling endpoint would silently corrupt every section that names
    // it; refuse instead of emitting a partially-wrong file.
    for link in graph.links() {
        if !link.resolved {
            let node_id = if graph.has_node(&link.start_node_id) {
                link.end_node_id.clone()
            } else {
                link.start_node_id.clone()
            };
            return Err(InpError::IncompleteNetwork {
                link_id: link.id.clone(),
                node_id,
            });
        }
    }

    let projection = projection_for(&settings.projection)?;

    let mut out = String::new();
    write_title(&mut out);
    write_junctions(&mut out, graph);
    write_reservoirs(&mut out, graph);
    write_tanks(&mut out, graph);
    write_pipes(&mut out, graph, settings);
    write_pumps(&mut out, graph);
    write_valves(&mut out, graph);
    write_patterns(&mut out, patterns);
    write_curves(&mut out, curves);
    write_controls(&mut out, controls);
    write_options(&mut out, settings);
    write_times(&mut out, settings);
    write_coordinates(&mut out, graph, projection.as_ref());
    write_vertices(&mut out, graph, projection.as_ref());
    out.push_str("[END]\n");

    Ok(out)
}

fn num(v: f64) -> String {
    format!("{v:.4}")
}

fn coord(v: f64) -> String {
    format!("{v:.6}")
}

fn section(out: &mut String, header: &str) {
    out.push('[');
    out.push_str(header);
    out.push_str("]\n");
}

fn end_section(out: &mut String) {
    out.push('\n');
}

/// One table row: every cell but the last is padded to the column width;
/// trailing whitespace is trimmed so empty tail cells leave no residue.
fn row(out: &mut String, cells: &[&str]) {
    let mut line = String::from(" ");
    for (i, cell) in cells.iter().enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{:<width$}", cell, width = COL));
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Key/value row for [OPTIONS] and [TIMES].
fn kv(out: &mut String, key: &str, value: &str) {
    let line = format!(" {:<width$}{}", key, value, width = KEY_COL);
    out.push_str(line.trim_end());
    out.push('\n');
}

fn comment(out: &mut String, text: &str) {
    out.push(';');
    out.push_str(text);
    out.push('\n');
}

fn write_title(out: &mut String) {
    section(out, "TITLE");
    end_section(out);
}

fn write_junctions(out: &mut String, graph: &NetworkGraph) {
    section(out, "JUNCTIONS");
    comment(out, "ID              Elev            Demand          Pattern");
    for node in graph.nodes() {
        if let FeatureKind::Junction {
            elevation,
            demand,
            pattern,
        } = &node.props
        {
            row(
                out,
                &[
                    node.id.as_str(),
                    num(elevation.unwrap_or(0.0)).as_str(),
                    num(demand.unwrap_or(0.0)).as_str(),
                    pattern.as_deref().unwrap_or(""),
                ],
            );
        }
    }
    end_section(out);
}

fn write_reservoirs(out: &mut String, graph: &NetworkGraph) {
    section(out, "RESERVOIRS");
    comment(out, "ID              Head            Pattern");
    for node in graph.nodes() {
        if let FeatureKind::Reservoir { head, pattern } = &node.props {
            row(
                out,
                &[
                    node.id.as_str(),
                    num(head.unwrap_or(0.0)).as_str(),
                    pattern.as_deref().unwrap_or(""),
                ],
            );
        }
    }
    end_section(out);
}

fn write_tanks(out: &mut String, graph: &NetworkGraph) {
    section(out, "TANKS");
    comment(
        out,
        "ID              Elevation       InitLevel       MinLevel        MaxLevel        Diameter        MinVol",
    );
    for node in graph.nodes() {
        if let FeatureKind::Tank {
            elevation,
            init_level,
            min_level,
            max_level,
            diameter,
            min_volume,
        } = &node.props
        {
            row(
                out,
                &[
                    node.id.as_str(),
                    num(elevation.unwrap_or(0.0)).as_str(),
                    num(*init_level).as_str(),
                    num(*min_level).as_str(),
                    num(*max_level).as_str(),
                    num(*diameter).as_str(),
                    num(min_volume.unwrap_or(0.0)).as_str(),
                ],
            );
        }
    }
    end_section(out);
}

fn write_pipes(out: &mut String, graph: &NetworkGraph, settings: &ProjectSettings) {
    section(out, "PIPES");
    comment(
        out,
        "ID              Node1           Node2           Length          Diameter        Roughness       Status",
    );
    for link in graph.links() {
        if let FeatureKind::Pipe {
            diameter,
            roughness,
            status,
            check_valve,
            ..
        } = &link.props
        {
            let status = if *check_valve {
                "CV"
            } else {
                status_token(*status)
            };
            row(
                out,
                &[
                    link.id.as_str(),
                    link.start_node_id.as_str(),
                    link.end_node_id.as_str(),
                    num(link.length).as_str(),
                    num(diameter.unwrap_or(DEFAULT_DIAMETER)).as_str(),
                    num(roughness.unwrap_or_else(|| settings.headloss.default_roughness()))
                        .as_str(),
                    status,
                ],
            );
        }
    }
    end_section(out);
}

fn write_pumps(out: &mut String, graph: &NetworkGraph) {
    section(out, "PUMPS");
    comment(out, "ID              Node1           Node2           Parameters");
    for link in graph.links() {
        if let FeatureKind::Pump {
            head_curve,
            power,
            speed,
            ..
        } = &link.props
        {
            let mut params = Vec::new();
            if let Some(curve) = head_curve {
                params.push(format!("HEAD {curve}"));
            } else if let Some(p) = power {
                params.push(format!("POWER {}", num(*p)));
            }
            if let Some(s) = speed {
                params.push(format!("SPEED {}", num(*s)));
            }
            let params = params.join(" ");
            row(
                out,
                &[
                    link.id.as_str(),
                    link.start_node_id.as_str(),
                    link.end_node_id.as_str(),
                    params.as_str(),
                ],
            );
        }
    }
    end_section(out);
}

fn write_valves(out: &mut String, graph: &NetworkGraph) {
    section(out, "VALVES");
    comment(
        out,
        "ID              Node1           Node2           Diameter        Type            Setting         MinorLoss",
    );
    for link in graph.links() {
        if let FeatureKind::Valve {
            kind,
            diameter,
            setting,
            minor_loss,
            ..
        } = &link.props
        {
            row(
                out,
                &[
                    link.id.as_str(),
                    link.start_node_id.as_str(),
                    link.end_node_id.as_str(),
                    num(diameter.unwrap_or(DEFAULT_DIAMETER)).as_str(),
                    kind.inp_token(),
                    num(*setting).as_str(),
                    num(*minor_loss).as_str(),
                ],
            );
        }
    }
    end_section(out);
}

fn write_patterns(out: &mut String, patterns: &[TimePattern]) {
    section(out, "PATTERNS");
    comment(out, "ID              Multipliers");
    for pattern in patterns {
        for chunk in pattern.multipliers.chunks(PATTERN_WRAP) {
            let mut cells: Vec<String> = vec![pattern.id.clone()];
            cells.extend(chunk.iter().map(|&m| num(m)));
            let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
            row(out, &refs);
        }
    }
    end_section(out);
}

fn write_curves(out: &mut String, curves: &[PumpCurve]) {
    section(out, "CURVES");
    comment(out, "ID              X-Value         Y-Value");
    for curve in curves {
        for &(x, y) in &curve.points {
            row(out, &[curve.id.as_str(), num(x).as_str(), num(y).as_str()]);
        }
    }
    end_section(out);
}

fn write_controls(out: &mut String, controls: &[NetworkControl]) {
    section(out, "CONTROLS");
    for control in controls {
        let action = action_token(&control.action);
        let line = match &control.trigger {
            ControlTrigger::LowLevel { node_id, level } => format!(
                " LINK {} {} IF NODE {} BELOW {}",
                control.link_id,
                action,
                node_id,
                num(*level)
            ),
            ControlTrigger::HiLevel { node_id, level } => format!(
                " LINK {} {} IF NODE {} ABOVE {}",
                control.link_id,
                action,
                node_id,
                num(*level)
            ),
            ControlTrigger::Timer { time } => format!(
                " LINK {} {} AT TIME {}",
                control.link_id,
                action,
                num(time.as_decimal_hours())
            ),
            ControlTrigger::TimeOfDay { clock } => {
                format!(" LINK {} {} AT CLOCKTIME {clock}", control.link_id, action)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    end_section(out);
}

fn write_options(out: &mut String, settings: &ProjectSettings) {
    section(out, "OPTIONS");
    kv(out, "UNITS", settings.flow_units.inp_token());
    kv(out, "HEADLOSS", settings.headloss.inp_token());
    kv(out, "SPECIFIC GRAVITY", &num(settings.specific_gravity));
    kv(out, "VISCOSITY", &num(settings.viscosity));
    kv(out, "TRIALS", &settings.max_trials.to_string());
    kv(out, "ACCURACY", &num(settings.accuracy));
    kv(out, "UNBALANCED", "CONTINUE 10");
    kv(out, "DEMAND MULTIPLIER", &num(settings.demand_multiplier));
    kv(out, "EMITTER EXPONENT", &num(settings.emitter_exponent));
    if let Some(pattern) = &settings.default_pattern {
        kv(out, "PATTERN", pattern);
    }
    end_section(out);
}

fn write_times(out: &mut String, settings: &ProjectSettings) {
    section(out, "TIMES");
    kv(out, "DURATION", &settings.duration.to_string());
    kv(out, "HYDRAULIC TIMESTEP", &settings.hydraulic_step.to_string());
    kv(out, "PATTERN TIMESTEP", &settings.pattern_step.to_string());
    kv(out, "REPORT TIMESTEP", &settings.report_step.to_string());
    kv(out, "REPORT START", &settings.report_start.to_string());
    kv(out, "START CLOCKTIME", &settings.start_clock.to_string());
    end_section(out);
}

fn write_coordinates(out: &mut String, graph: &NetworkGraph, projection: &dyn Projection) {
    section(out, "COORDINATES");
    comment(out, "Node            X-Coord         Y-Coord");
    for node in graph.nodes() {
        if let Some((lon, lat)) = project_point(projection, node) {
            row(
                out,
                &[node.id.as_str(), coord(lon).as_str(), coord(lat).as_str()],
            );
        }
    }
    end_section(out);
}

fn write_vertices(out: &mut String, graph: &NetworkGraph, projection: &dyn Projection) {
    section(out, "VERTICES");
    comment(out, "Link            X-Coord         Y-Coord");
    for link in graph.links() {
        for (lon, lat) in interior_vertices(projection, link) {
            row(
                out,
                &[link.id.as_str(), coord(lon).as_str(), coord(lat).as_str()],
            );
        }
    }
    end_section(out);
}

fn project_point(projection: &dyn Projection, node: &GraphNode) -> Option<(f64, f64)> {
    let (x, y) = (node.location.x(), node.location.y());
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some(projection.to_geographic(x, y))
}

/// Interior vertices of a link's polyline; the end coordinates belong to
/// its nodes and are not repeated here.
fn interior_vertices(projection: &dyn Projection, link: &GraphLink) -> Vec<(f64, f64)> {
    let coords = &link.geometry.0;
    if coords.len() <= 2 {
        return Vec::new();
    }
    coords[1..coords.len() - 1]
        .iter()
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .map(|c| projection.to_geographic(c.x, c.y))
        .collect()
}

fn status_token(status: LinkStatus) -> &'static str {
    match status {
        LinkStatus::Open => "Open",
        LinkStatus::Closed => "Closed",
    }
}

fn action_token(action: &ControlAction) -> String {
    match action {
        ControlAction::Open => "OPEN".to_string(),
        ControlAction::Closed => "CLOSED".to_string(),
        ControlAction::Setting { value } => num(*value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_precision_is_fixed() {
        assert_eq!(num(1.23456), "1.2346");
        assert_eq!(num(10.0), "10.0000");
        assert_eq!(num(0.0), "0.0000");
    }

    #[test]
    fn rows_trim_trailing_cells() {
        let mut out = String::new();
        row(&mut out, &["J1", "120.0000", ""]);
        assert_eq!(out, " J1              120.0000\n");
    }

    #[test]
    fn kv_pads_key_column() {
        let mut out = String::new();
        kv(&mut out, "UNITS", "LPS");
        assert_eq!(out, " UNITS               LPS\n");
    }
}
