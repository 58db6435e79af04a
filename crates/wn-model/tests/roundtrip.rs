//! Project file round-trip tests.

use geo::{Point, line_string};
use wn_model::{
    ControlAction, ControlTrigger, CurveKind, FeatureGeometry, FeatureKind, LinkStatus,
    NetworkControl, NetworkFeature, Project, PumpCurve, TimePattern, ValveKind,
};

fn sample_project() -> Project {
    let mut project = Project::new("roundtrip");
    project.features = vec![
        NetworkFeature {
            id: "J1".to_string(),
            kind: FeatureKind::Junction {
                elevation: Some(120.0),
                demand: Some(1.5),
                pattern: Some("PAT1".to_string()),
            },
            geometry: FeatureGeometry::Point {
                point: Point::new(100.0, 200.0),
            },
        },
        NetworkFeature {
            id: "T1".to_string(),
            kind: FeatureKind::Tank {
                elevation: Some(150.0),
                init_level: 3.0,
                min_level: 0.5,
                max_level: 6.0,
                diameter: 12.0,
                min_volume: None,
            },
            geometry: FeatureGeometry::Point {
                point: Point::new(300.0, 200.0),
            },
        },
        NetworkFeature {
            id: "P1".to_string(),
            kind: FeatureKind::Pipe {
                start_node_id: "J1".to_string(),
                end_node_id: "T1".to_string(),
                length: None,
                diameter: Some(200.0),
                roughness: Some(110.0),
                status: LinkStatus::Open,
                check_valve: false,
            },
            geometry: FeatureGeometry::Polyline {
                line: line_string![(x: 100.0, y: 200.0), (x: 300.0, y: 200.0)],
            },
        },
        NetworkFeature {
            id: "V1".to_string(),
            kind: FeatureKind::Valve {
                start_node_id: "T1".to_string(),
                end_node_id: "J1".to_string(),
                kind: ValveKind::Prv,
                diameter: Some(100.0),
                setting: 45.0,
                minor_loss: 0.0,
            },
            geometry: FeatureGeometry::Polyline {
                line: line_string![(x: 300.0, y: 200.0), (x: 100.0, y: 200.0)],
            },
        },
    ];
    project.patterns = vec![TimePattern {
        id: "PAT1".to_string(),
        multipliers: vec![0.5, 1.0, 1.5, 1.2],
    }];
    project.curves = vec![PumpCurve {
        id: "C1".to_string(),
        kind: CurveKind::Pump,
        points: vec![(0.0, 60.0), (50.0, 45.0), (100.0, 20.0)],
    }];
    project.controls = vec![NetworkControl {
        link_id: "P1".to_string(),
        action: ControlAction::Closed,
        trigger: ControlTrigger::HiLevel {
            node_id: "T1".to_string(),
            level: 5.5,
        },
    }];
    project
}

#[test]
fn json_round_trip_preserves_project() {
    let dir = std::env::temp_dir().join(format!("wn-model-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.json");

    let project = sample_project();
    wn_model::save_json(&path, &project).unwrap();
    let loaded = wn_model::load_json(&path).unwrap();
    assert_eq!(loaded, project);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn yaml_round_trip_preserves_project() {
    let dir = std::env::temp_dir().join(format!("wn-model-test-yaml-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.yaml");

    let project = sample_project();
    wn_model::save_yaml(&path, &project).unwrap();
    let loaded = wn_model::load_yaml(&path).unwrap();
    assert_eq!(loaded, project);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn settings_times_persist_as_clock_strings() {
    let project = sample_project();
    let json = serde_json::to_string(&project).unwrap();
    assert!(json.contains("\"duration\":\"24:00\""));
    assert!(json.contains("\"hydraulic_step\":\"01:00\""));
}
