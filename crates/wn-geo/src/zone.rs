//! UTM zone derivation.
//!
//! A project picks a locally accurate planar projection by deriving the
//! UTM zone of its service area, either from a coordinate directly or
//! from a place name resolved through the geocoding collaborator.

use core::fmt;

use crate::error::{GeoError, GeoResult};
use crate::lookup::Geocoder;
use crate::projection::UtmProjection;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
        })
    }
}

/// A derived UTM zone: longitudinal band, hemisphere, and the EPSG code
/// that names the matching projected reference system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UtmZone {
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    /// Derive the zone containing a geographic coordinate.
    ///
    /// Deriving twice for the same location yields the same zone.
    pub fn from_lon_lat(lon: f64, lat: f64) -> GeoResult<Self> {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::OutOfRange {
                what: "longitude",
                value: lon,
            });
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::OutOfRange {
                what: "latitude",
                value: lat,
            });
        }

        // lon == 180.0 would land in band 61; fold it into zone 60
        let zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8;
        let hemisphere = if lat >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };

        Ok(Self { zone, hemisphere })
    }

    pub fn epsg(&self) -> u32 {
        match self.hemisphere {
            Hemisphere::North => 32600 + u32::from(self.zone),
            Hemisphere::South => 32700 + u32::from(self.zone),
        }
    }

    /// Identifier in the form used by project settings, e.g. `EPSG:32643`.
    pub fn epsg_code(&self) -> String {
        format!("EPSG:{}", self.epsg())
    }

    /// proj4-style definition string for consumers that register custom
    /// reference systems.
    pub fn proj_definition(&self) -> String {
        let south = match self.hemisphere {
            Hemisphere::North => "",
            Hemisphere::South => " +south",
        };
        format!(
            "+proj=utm +zone={}{south} +datum=WGS84 +units=m +no_defs",
            self.zone
        )
    }

    pub fn projection(&self) -> UtmProjection {
        UtmProjection::for_zone(self)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.hemisphere)
    }
}

/// Resolve a place name through the geocoding collaborator and derive the
/// UTM zone of the resulting coordinate.
///
/// Geocoding is a network call; `LocationNotFound` and
/// `NetworkUnavailable` surface unchanged.
pub fn derive_zone_from_place(geocoder: &dyn Geocoder, name: &str) -> GeoResult<UtmZone> {
    let place = geocoder.geocode(name)?;
    tracing::debug!(
        place = %place.display_name,
        lon = place.lon,
        lat = place.lat,
        "geocoded place for zone derivation"
    );
    UtmZone::from_lon_lat(place.lon, place.lat)
}
