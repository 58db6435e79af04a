use thiserror::Error;

pub type GeoResult<T> = Result<T, GeoError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Location not found: {place}")]
    LocationNotFound { place: String },

    #[error("Network unavailable: {message}")]
    NetworkUnavailable { message: String },

    #[error("Unknown projection identifier: {code}")]
    UnknownProjection { code: String },

    #[error("Coordinate out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}
