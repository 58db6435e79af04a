//! Project shape validation.
//!
//! Checks that a persisted project is internally consistent in shape:
//! ids are non-empty, numeric fields are finite, pattern/curve tables
//! carry no duplicates. Topology-level defects (dangling links, duplicate
//! feature ids, disconnected components) are deliberately NOT checked
//! here — a mid-edit network is expected to have them, and the topology
//! validator reports them as findings instead of refusing to load.

use std::collections::HashSet;

use crate::schema::{
    ControlAction, FeatureKind, NetworkFeature, Project, ProjectSettings, PumpCurve, TimePattern,
};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Empty ID in {context}")]
    EmptyId { context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > crate::schema::SCHEMA_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    validate_settings(&project.settings)?;

    for feature in &project.features {
        validate_feature(feature)?;
    }

    let mut pattern_ids = HashSet::new();
    for pattern in &project.patterns {
        if !pattern_ids.insert(&pattern.id) {
            return Err(ValidationError::DuplicateId {
                id: pattern.id.clone(),
                context: "patterns".to_string(),
            });
        }
        validate_pattern(pattern)?;
    }

    let mut curve_ids = HashSet::new();
    for curve in &project.curves {
        if !curve_ids.insert(&curve.id) {
            return Err(ValidationError::DuplicateId {
                id: curve.id.clone(),
                context: "curves".to_string(),
            });
        }
        validate_curve(curve)?;
    }

    for control in &project.controls {
        if control.link_id.is_empty() {
            return Err(ValidationError::EmptyId {
                context: "control link_id".to_string(),
            });
        }
        if let ControlAction::Setting { value } = &control.action
            && !value.is_finite()
        {
            return Err(ValidationError::InvalidValue {
                field: format!("control '{}' setting", control.link_id),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_settings(settings: &ProjectSettings) -> Result<(), ValidationError> {
    if settings.max_trials == 0 {
        return Err(ValidationError::InvalidValue {
            field: "settings max_trials".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    validate_positive_finite("settings accuracy", settings.accuracy)?;
    validate_positive_finite("settings specific_gravity", settings.specific_gravity)?;
    validate_positive_finite("settings viscosity", settings.viscosity)?;
    validate_non_negative_finite("settings emitter_exponent", settings.emitter_exponent)?;
    validate_non_negative_finite("settings demand_multiplier", settings.demand_multiplier)?;
    Ok(())
}

fn validate_feature(feature: &NetworkFeature) -> Result<(), ValidationError> {
    if feature.id.is_empty() {
        return Err(ValidationError::EmptyId {
            context: "features".to_string(),
        });
    }

    let field = |name: &str| format!("{} '{}' {}", feature.kind_name(), feature.id, name);

    match &feature.kind {
        FeatureKind::Junction {
            elevation, demand, ..
        } => {
            validate_optional_finite(&field("elevation"), *elevation)?;
            validate_optional_finite(&field("demand"), *demand)?;
        }
        FeatureKind::Tank {
            elevation,
            init_level,
            min_level,
            max_level,
            diameter,
            min_volume,
        } => {
            validate_optional_finite(&field("elevation"), *elevation)?;
            validate_non_negative_finite(&field("init_level"), *init_level)?;
            validate_non_negative_finite(&field("min_level"), *min_level)?;
            validate_non_negative_finite(&field("max_level"), *max_level)?;
            validate_positive_finite(&field("diameter"), *diameter)?;
            validate_optional_finite(&field("min_volume"), *min_volume)?;
            if min_level > max_level {
                return Err(ValidationError::InvalidValue {
                    field: field("min_level"),
                    value: min_level.to_string(),
                    reason: format!("exceeds max_level {max_level}"),
                });
            }
        }
        FeatureKind::Reservoir { head, .. } => {
            validate_optional_finite(&field("head"), *head)?;
        }
        FeatureKind::Pipe {
            length,
            diameter,
            roughness,
            ..
        } => {
            validate_optional_finite(&field("length"), *length)?;
            validate_optional_finite(&field("diameter"), *diameter)?;
            validate_optional_finite(&field("roughness"), *roughness)?;
        }
        FeatureKind::Pump { power, speed, .. } => {
            validate_optional_finite(&field("power"), *power)?;
            validate_optional_finite(&field("speed"), *speed)?;
        }
        FeatureKind::Valve {
            diameter,
            setting,
            minor_loss,
            ..
        } => {
            validate_optional_finite(&field("diameter"), *diameter)?;
            if !setting.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: field("setting"),
                    value: setting.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
            validate_non_negative_finite(&field("minor_loss"), *minor_loss)?;
        }
    }

    Ok(())
}

fn validate_pattern(pattern: &TimePattern) -> Result<(), ValidationError> {
    if pattern.multipliers.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("pattern '{}' multipliers", pattern.id),
            value: "[]".to_string(),
            reason: "needs at least one multiplier".to_string(),
        });
    }
    for &m in &pattern.multipliers {
        if !m.is_finite() || m < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("pattern '{}' multiplier", pattern.id),
                value: m.to_string(),
                reason: "must be non-negative and finite".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_curve(curve: &PumpCurve) -> Result<(), ValidationError> {
    for &(x, y) in &curve.points {
        if !x.is_finite() || !y.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("curve '{}' point", curve.id),
                value: format!("({x}, {y})"),
                reason: "must be finite".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_optional_finite(field: &str, value: Option<f64>) -> Result<(), ValidationError> {
    if let Some(v) = value
        && !v.is_finite()
    {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be finite".to_string(),
        });
    }
    Ok(())
}

fn validate_positive_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_non_negative_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}
