//! GeoJSON rendering of the network.
//!
//! Coordinates reproject to geographic WGS84 at write time with 6
//! decimal places. Only the hydraulic attributes of each feature are
//! exported; derived adjacency and any editing state stay internal.

use serde_json::{Map, Value, json};
use wn_geo::Projection;
use wn_graph::{GraphLink, GraphNode, NetworkGraph};
use wn_model::FeatureKind;

/// Render the network as a GeoJSON FeatureCollection string.
pub fn network_geojson(graph: &NetworkGraph, projection: &dyn Projection) -> String {
    let mut features = Vec::new();

    for node in graph.nodes() {
        features.push(node_feature(node, projection));
    }
    for link in graph.links() {
        features.push(link_feature(link, projection));
    }

    let collection = json!({
        "type": "FeatureCollection",
        "features": features,
    });
    serde_json::to_string_pretty(&collection).unwrap_or_default()
}

fn node_feature(node: &GraphNode, projection: &dyn Projection) -> Value {
    let (lon, lat) = projection.to_geographic(node.location.x(), node.location.y());

    let mut props = Map::new();
    props.insert("id".to_string(), json!(node.id));
    match &node.props {
        FeatureKind::Junction {
            elevation,
            demand,
            pattern,
        } => {
            props.insert("type".to_string(), json!("junction"));
            insert_opt(&mut props, "elevation", *elevation);
            insert_opt(&mut props, "demand", *demand);
            if let Some(pattern) = pattern {
                props.insert("pattern".to_string(), json!(pattern));
            }
        }
        FeatureKind::Tank {
            elevation,
            init_level,
            min_level,
            max_level,
            diameter,
            min_volume,
        } => {
            props.insert("type".to_string(), json!("tank"));
            insert_opt(&mut props, "elevation", *elevation);
            props.insert("init_level".to_string(), json!(init_level));
            props.insert("min_level".to_string(), json!(min_level));
            props.insert("max_level".to_string(), json!(max_level));
            props.insert("diameter".to_string(), json!(diameter));
            insert_opt(&mut props, "min_volume", *min_volume);
        }
        FeatureKind::Reservoir { head, pattern } => {
            props.insert("type".to_string(), json!("reservoir"));
            insert_opt(&mut props, "head", *head);
            if let Some(pattern) = pattern {
                props.insert("pattern".to_string(), json!(pattern));
            }
        }
        _ => {}
    }

    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            "coordinates": [round6(lon), round6(lat)],
        },
        "properties": Value::Object(props),
    })
}

fn link_feature(link: &GraphLink, projection: &dyn Projection) -> Value {
    let coordinates: Vec<[f64; 2]> = link
        .geometry
        .0
        .iter()
        .map(|c| {
            let (lon, lat) = projection.to_geographic(c.x, c.y);
            [round6(lon), round6(lat)]
        })
        .collect();

    let mut props = Map::new();
    props.insert("id".to_string(), json!(link.id));
    props.insert("start_node_id".to_string(), json!(link.start_node_id));
    props.insert("end_node_id".to_string(), json!(link.end_node_id));
    match &link.props {
        FeatureKind::Pipe {
            diameter,
            roughness,
            status,
            check_valve,
            ..
        } => {
            props.insert("type".to_string(), json!("pipe"));
            props.insert("length".to_string(), json!(link.length));
            insert_opt(&mut props, "diameter", *diameter);
            insert_opt(&mut props, "roughness", *roughness);
            props.insert("status".to_string(), json!(format!("{status:?}")));
            props.insert("check_valve".to_string(), json!(check_valve));
        }
        FeatureKind::Pump {
            head_curve, power, ..
        } => {
            props.insert("type".to_string(), json!("pump"));
            if let Some(curve) = head_curve {
                props.insert("head_curve".to_string(), json!(curve));
            }
            insert_opt(&mut props, "power", *power);
        }
        FeatureKind::Valve {
            kind,
            diameter,
            setting,
            ..
        } => {
            props.insert("type".to_string(), json!("valve"));
            props.insert("valve_type".to_string(), json!(kind.inp_token()));
            insert_opt(&mut props, "diameter", *diameter);
            props.insert("setting".to_string(), json!(setting));
        }
        _ => {}
    }

    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
        "properties": Value::Object(props),
    })
}

fn insert_opt(props: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if let Some(v) = value {
        props.insert(key.to_string(), json!(v));
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}
