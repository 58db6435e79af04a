//! Project schema definitions.
//!
//! Feature properties are a closed tagged variant per feature type rather
//! than a free-form bag: required fields are plain, optional fields are
//! `Option`, and anything else is rejected at deserialization time.

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};
use wn_core::{ClockTime, FlowUnits, HeadlossFormula};

/// Current schema version written by `save_*`.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub meta: ProjectMeta,
    #[serde(default)]
    pub features: Vec<NetworkFeature>,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub patterns: Vec<TimePattern>,
    #[serde(default)]
    pub curves: Vec<PumpCurve>,
    #[serde(default)]
    pub controls: Vec<NetworkControl>,
}

impl Project {
    /// Fresh empty project with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            meta: ProjectMeta {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.into(),
            },
            features: Vec::new(),
            settings: ProjectSettings::default(),
            patterns: Vec::new(),
            curves: Vec::new(),
            controls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectMeta {
    pub id: String,
    pub name: String,
}

/// One map feature: a node (junction, tank, reservoir) or a link (pipe,
/// pump, valve).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkFeature {
    pub id: String,
    pub kind: FeatureKind,
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FeatureGeometry {
    Point { point: Point<f64> },
    Polyline { line: LineString<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FeatureKind {
    Junction {
        elevation: Option<f64>,
        demand: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Tank {
        elevation: Option<f64>,
        init_level: f64,
        min_level: f64,
        max_level: f64,
        diameter: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_volume: Option<f64>,
    },
    Reservoir {
        head: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Pipe {
        start_node_id: String,
        end_node_id: String,
        /// Overrides the geometric length when present.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<f64>,
        diameter: Option<f64>,
        roughness: Option<f64>,
        #[serde(default)]
        status: LinkStatus,
        #[serde(default)]
        check_valve: bool,
    },
    Pump {
        start_node_id: String,
        end_node_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        head_curve: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        power: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<f64>,
    },
    Valve {
        start_node_id: String,
        end_node_id: String,
        kind: ValveKind,
        diameter: Option<f64>,
        setting: f64,
        #[serde(default)]
        minor_loss: f64,
    },
}

impl NetworkFeature {
    pub fn is_node(&self) -> bool {
        matches!(
            self.kind,
            FeatureKind::Junction { .. } | FeatureKind::Tank { .. } | FeatureKind::Reservoir { .. }
        )
    }

    pub fn is_link(&self) -> bool {
        !self.is_node()
    }

    /// Lowercase type name for reporting.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            FeatureKind::Junction { .. } => "junction",
            FeatureKind::Tank { .. } => "tank",
            FeatureKind::Reservoir { .. } => "reservoir",
            FeatureKind::Pipe { .. } => "pipe",
            FeatureKind::Pump { .. } => "pump",
            FeatureKind::Valve { .. } => "valve",
        }
    }

    /// Start/end node ids for links, None for nodes.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match &self.kind {
            FeatureKind::Pipe {
                start_node_id,
                end_node_id,
                ..
            }
            | FeatureKind::Pump {
                start_node_id,
                end_node_id,
                ..
            }
            | FeatureKind::Valve {
                start_node_id,
                end_node_id,
                ..
            } => Some((start_node_id, end_node_id)),
            _ => None,
        }
    }

    /// Pumps and valves are in-line devices with no physical extent of
    /// their own; zero geometric length is expected for them.
    pub fn is_zero_length_device(&self) -> bool {
        matches!(
            self.kind,
            FeatureKind::Pump { .. } | FeatureKind::Valve { .. }
        )
    }

    pub fn point(&self) -> Option<Point<f64>> {
        match &self.geometry {
            FeatureGeometry::Point { point } => Some(*point),
            FeatureGeometry::Polyline { line } => line.0.first().map(|c| Point::from(*c)),
        }
    }

    pub fn polyline(&self) -> Option<&LineString<f64>> {
        match &self.geometry {
            FeatureGeometry::Polyline { line } => Some(line),
            FeatureGeometry::Point { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LinkStatus {
    #[default]
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValveKind {
    /// Pressure reducing
    Prv,
    /// Pressure sustaining
    Psv,
    /// Pressure breaker
    Pbv,
    /// Flow control
    Fcv,
    /// Throttle control
    Tcv,
    /// General purpose
    Gpv,
}

impl ValveKind {
    pub fn inp_token(self) -> &'static str {
        match self {
            ValveKind::Prv => "PRV",
            ValveKind::Psv => "PSV",
            ValveKind::Pbv => "PBV",
            ValveKind::Fcv => "FCV",
            ValveKind::Tcv => "TCV",
            ValveKind::Gpv => "GPV",
        }
    }
}

/// Hydraulic and reporting configuration for one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectSettings {
    pub flow_units: FlowUnits,
    pub headloss: HeadlossFormula,
    pub max_trials: u32,
    pub accuracy: f64,
    pub specific_gravity: f64,
    pub viscosity: f64,
    pub emitter_exponent: f64,
    pub demand_multiplier: f64,
    pub duration: ClockTime,
    pub hydraulic_step: ClockTime,
    pub pattern_step: ClockTime,
    pub report_step: ClockTime,
    pub report_start: ClockTime,
    pub start_clock: ClockTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pattern: Option<String>,
    /// EPSG identifier of the planar reference system features are stored
    /// in.
    pub projection: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            flow_units: FlowUnits::Lps,
            headloss: HeadlossFormula::HazenWilliams,
            max_trials: 40,
            accuracy: 0.001,
            specific_gravity: 1.0,
            viscosity: 1.0,
            emitter_exponent: 0.5,
            demand_multiplier: 1.0,
            duration: ClockTime::new(24, 0),
            hydraulic_step: ClockTime::new(1, 0),
            pattern_step: ClockTime::new(1, 0),
            report_step: ClockTime::new(1, 0),
            report_start: ClockTime::new(0, 0),
            start_clock: ClockTime::new(0, 0),
            default_pattern: None,
            projection: "EPSG:3857".to_string(),
        }
    }
}

/// A time series of demand multipliers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimePattern {
    pub id: String,
    pub multipliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurveKind {
    /// Head vs flow for a pump
    Pump,
    /// Volume vs level for a tank
    Volume,
    /// Headloss vs flow for a general-purpose valve
    Headloss,
}

/// A tabulated function as ordered (x, y) points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpCurve {
    pub id: String,
    pub kind: CurveKind,
    pub points: Vec<(f64, f64)>,
}

impl PumpCurve {
    /// Volume and headloss curves must be tabulated over increasing x.
    pub fn requires_monotonic_x(&self) -> bool {
        matches!(self.kind, CurveKind::Volume | CurveKind::Headloss)
    }

    pub fn is_monotonic_x(&self) -> bool {
        self.points.windows(2).all(|w| w[0].0 < w[1].0)
    }
}

/// What a control does to its target link when it fires.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControlAction {
    Open,
    Closed,
    Setting { value: f64 },
}

/// What causes a control to fire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ControlTrigger {
    /// Tank/junction level drops below `level`
    LowLevel { node_id: String, level: f64 },
    /// Tank/junction level rises above `level`
    HiLevel { node_id: String, level: f64 },
    /// Fixed time offset from simulation start
    Timer { time: ClockTime },
    /// Wall-clock time of day
    TimeOfDay { clock: ClockTime },
}

/// A conditional rule altering a link's status or setting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkControl {
    pub link_id: String,
    pub action: ControlAction,
    pub trigger: ControlTrigger,
}

impl NetworkControl {
    /// Node referenced by a level trigger, if any.
    pub fn trigger_node(&self) -> Option<&str> {
        match &self.trigger {
            ControlTrigger::LowLevel { node_id, .. } | ControlTrigger::HiLevel { node_id, .. } => {
                Some(node_id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, line_string};

    fn junction(id: &str) -> NetworkFeature {
        NetworkFeature {
            id: id.to_string(),
            kind: FeatureKind::Junction {
                elevation: Some(100.0),
                demand: Some(0.5),
                pattern: None,
            },
            geometry: FeatureGeometry::Point {
                point: Point::new(1.0, 2.0),
            },
        }
    }

    #[test]
    fn node_link_partition() {
        let j = junction("J1");
        assert!(j.is_node());
        assert!(!j.is_link());
        assert_eq!(j.kind_name(), "junction");
        assert!(j.endpoints().is_none());

        let p = NetworkFeature {
            id: "P1".to_string(),
            kind: FeatureKind::Pipe {
                start_node_id: "J1".to_string(),
                end_node_id: "J2".to_string(),
                length: None,
                diameter: Some(150.0),
                roughness: None,
                status: LinkStatus::Open,
                check_valve: false,
            },
            geometry: FeatureGeometry::Polyline {
                line: line_string![(x: 0.0, y: 0.0), (x: 3.0, y: 4.0)],
            },
        };
        assert!(p.is_link());
        assert_eq!(p.endpoints(), Some(("J1", "J2")));
        assert!(!p.is_zero_length_device());
    }

    #[test]
    fn pumps_and_valves_are_zero_length_devices() {
        let pump = NetworkFeature {
            id: "PU1".to_string(),
            kind: FeatureKind::Pump {
                start_node_id: "J1".to_string(),
                end_node_id: "J2".to_string(),
                head_curve: Some("C1".to_string()),
                power: None,
                speed: None,
            },
            geometry: FeatureGeometry::Polyline {
                line: line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 0.0)],
            },
        };
        assert!(pump.is_zero_length_device());
    }

    #[test]
    fn curve_monotonicity() {
        let curve = PumpCurve {
            id: "V1".to_string(),
            kind: CurveKind::Volume,
            points: vec![(0.0, 0.0), (1.0, 10.0), (2.0, 30.0)],
        };
        assert!(curve.requires_monotonic_x());
        assert!(curve.is_monotonic_x());

        let bad = PumpCurve {
            points: vec![(0.0, 0.0), (2.0, 30.0), (1.0, 10.0)],
            ..curve
        };
        assert!(!bad.is_monotonic_x());
    }

    #[test]
    fn settings_json_round_trip() {
        let settings = ProjectSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"24:00\""));
        let back: ProjectSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn feature_json_round_trip() {
        let j = junction("J1");
        let json = serde_json::to_string(&j).unwrap();
        let back: NetworkFeature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, j);
    }
}
