//! wn-geo: coordinate projections and external geo collaborators.
//!
//! Provides:
//! - `Projection` trait with Web-Mercator, UTM, and geographic
//!   passthrough implementations
//! - UTM zone derivation from a coordinate or a geocoded place name
//! - `Geocoder` / `ElevationProvider` collaborator traits with a
//!   chunked, partial-failure batch helper

pub mod error;
pub mod lookup;
pub mod projection;
pub mod zone;

pub use error::{GeoError, GeoResult};
pub use lookup::{
    ElevationBatch, ElevationProvider, ElevationQuery, GeocodedPlace, Geocoder, fetch_elevations,
};
pub use projection::{Geographic, Projection, UtmProjection, WebMercator, projection_for};
pub use zone::{Hemisphere, UtmZone, derive_zone_from_place};
