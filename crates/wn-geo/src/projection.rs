//! Coordinate projections between planar map coordinates and WGS84
//! geographic coordinates.
//!
//! Map features are edited in a planar reference system (Web-Mercator by
//! default, or a locally accurate UTM zone); the solver export and
//! GeoJSON output want geographic lon/lat. Both directions round-trip
//! within 1e-6 degrees.

use std::f64::consts::PI;

use crate::error::{GeoError, GeoResult};
use crate::zone::{Hemisphere, UtmZone};

/// WGS84 equatorial radius in meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Trait for planar <-> geographic conversions.
///
/// `x`/`y` are in the projection's native units (meters for Mercator and
/// UTM); geographic coordinates are degrees, lon before lat.
pub trait Projection {
    /// Convert planar (x, y) to geographic (lon, lat).
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64);

    /// Convert geographic (lon, lat) to planar (x, y).
    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64);
}

/// Identity projection for data already stored in geographic degrees
/// (EPSG:4326).
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Projection for Geographic {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon, lat)
    }
}

/// Spherical Web-Mercator (EPSG:3857), the default editing projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = x / WGS84_A * 180.0 / PI;
        let lat = (2.0 * (y / WGS84_A).exp().atan() - PI / 2.0) * 180.0 / PI;
        (lon, lat)
    }

    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = WGS84_A * lon * PI / 180.0;
        let y = WGS84_A * (PI / 4.0 + lat * PI / 180.0 / 2.0).tan().ln();
        (x, y)
    }
}

/// Transverse Mercator on the WGS84 ellipsoid for one UTM zone.
///
/// Accurate to sub-millimeter within the zone; used when a project has
/// derived a local zone from its location.
#[derive(Debug, Clone, Copy)]
pub struct UtmProjection {
    /// Central meridian in degrees
    lon0: f64,
    /// False northing: 0 north, 10,000,000 south
    false_northing: f64,
    zone: u8,
    hemisphere: Hemisphere,
}

/// Scale factor at the central meridian
const UTM_K0: f64 = 0.9996;
/// False easting in meters
const UTM_FALSE_EASTING: f64 = 500_000.0;

impl UtmProjection {
    pub fn new(zone: u8, hemisphere: Hemisphere) -> GeoResult<Self> {
        if !(1..=60).contains(&zone) {
            return Err(GeoError::OutOfRange {
                what: "UTM zone",
                value: f64::from(zone),
            });
        }
        Ok(Self {
            lon0: f64::from(zone) * 6.0 - 183.0,
            false_northing: match hemisphere {
                Hemisphere::North => 0.0,
                Hemisphere::South => 10_000_000.0,
            },
            zone,
            hemisphere,
        })
    }

    pub fn for_zone(zone: &UtmZone) -> Self {
        // UtmZone carries a validated 1..=60 zone number
        Self::new(zone.zone, zone.hemisphere).unwrap_or(Self {
            lon0: 3.0,
            false_northing: 0.0,
            zone: 31,
            hemisphere: Hemisphere::North,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }
}

/// First eccentricity squared of the WGS84 ellipsoid.
fn e2() -> f64 {
    2.0 * WGS84_F - WGS84_F * WGS84_F
}

/// Meridian arc length from the equator to latitude `phi` (radians).
fn meridian_arc(phi: f64) -> f64 {
    let e2 = e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    WGS84_A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
}

impl Projection for UtmProjection {
    fn from_geographic(&self, lon: f64, lat: f64) -> (f64, f64) {
        let phi = lat * PI / 180.0;
        let dlam = (lon - self.lon0) * PI / 180.0;

        let e2 = e2();
        let ep2 = e2 / (1.0 - e2);

        let sin_phi = phi.sin();
        let cos_phi = phi.cos();
        let nu = WGS84_A / (1.0 - e2 * sin_phi * sin_phi).sqrt();
        let t = phi.tan().powi(2);
        let c = ep2 * cos_phi * cos_phi;
        let a = dlam * cos_phi;

        let easting = UTM_K0
            * nu
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0)
            + UTM_FALSE_EASTING;

        let northing = UTM_K0
            * (meridian_arc(phi)
                + nu * phi.tan()
                    * (a * a / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6)
                            / 720.0))
            + self.false_northing;

        (easting, northing)
    }

    fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - UTM_FALSE_EASTING;
        let y = y - self.false_northing;

        let e2 = e2();
        let ep2 = e2 / (1.0 - e2);
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let mu = y
            / UTM_K0
            / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        // Footprint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let sin1 = phi1.sin();
        let nu1 = WGS84_A / (1.0 - e2 * sin1 * sin1).sqrt();
        let rho1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin1 * sin1).powf(1.5);
        let t1 = phi1.tan().powi(2);
        let c1 = ep2 * phi1.cos().powi(2);
        let d = x / (nu1 * UTM_K0);

        let lat = phi1
            - (nu1 * phi1.tan() / rho1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos()
                * 180.0
                / PI;

        (lon, lat * 180.0 / PI)
    }
}

/// Resolve an `"EPSG:nnnn"` identifier to a projection.
///
/// Supported: 4326 (geographic passthrough), 3857 (Web-Mercator), and
/// the UTM ranges 32601-32660 (north) and 32701-32760 (south).
pub fn projection_for(code: &str) -> GeoResult<Box<dyn Projection>> {
    let unknown = || GeoError::UnknownProjection {
        code: code.to_string(),
    };

    let digits = code.strip_prefix("EPSG:").ok_or_else(unknown)?;
    let epsg: u32 = digits.parse().map_err(|_| unknown())?;

    match epsg {
        4326 => Ok(Box::new(Geographic)),
        3857 => Ok(Box::new(WebMercator)),
        32601..=32660 => Ok(Box::new(UtmProjection::new(
            (epsg - 32600) as u8,
            Hemisphere::North,
        )?)),
        32701..=32760 => Ok(Box::new(UtmProjection::new(
            (epsg - 32700) as u8,
            Hemisphere::South,
        )?)),
        _ => Err(unknown()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    #[test]
    fn web_mercator_round_trip() {
        let proj = WebMercator;
        for (lon, lat) in [(0.0, 0.0), (8.75, 63.75), (-122.4, 37.8), (77.2, 28.6)] {
            let (x, y) = proj.from_geographic(lon, lat);
            let (lon2, lat2) = proj.to_geographic(x, y);
            assert!((lon - lon2).abs() < TOL, "lon {lon} -> {lon2}");
            assert!((lat - lat2).abs() < TOL, "lat {lat} -> {lat2}");
        }
    }

    #[test]
    fn web_mercator_known_point() {
        // Greenwich equator maps to the planar origin
        let (x, y) = WebMercator.from_geographic(0.0, 0.0);
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn utm_known_point() {
        // Bergen (5.32E, 60.39N) in zone 32N: ~297 km easting, ~6700 km northing
        let proj = UtmProjection::new(32, Hemisphere::North).unwrap();
        let (x, y) = proj.from_geographic(5.32, 60.39);
        assert!((x - 297_000.0).abs() < 1000.0, "easting {x}");
        assert!((y - 6_700_000.0).abs() < 10_000.0, "northing {y}");
    }

    #[test]
    fn utm_round_trip() {
        let proj = UtmProjection::new(43, Hemisphere::North).unwrap();
        for (lon, lat) in [(77.2, 28.6), (75.1, 8.2), (76.9, 33.0)] {
            let (x, y) = proj.from_geographic(lon, lat);
            let (lon2, lat2) = proj.to_geographic(x, y);
            assert!((lon - lon2).abs() < TOL);
            assert!((lat - lat2).abs() < TOL);
        }
    }

    #[test]
    fn utm_southern_hemisphere() {
        let proj = UtmProjection::new(56, Hemisphere::South).unwrap();
        let (x, y) = proj.from_geographic(151.2, -33.87); // Sydney
        assert!(y > 0.0, "false northing keeps northing positive: {y}");
        let (lon2, lat2) = proj.to_geographic(x, y);
        assert!((151.2 - lon2).abs() < TOL);
        assert!((-33.87 - lat2).abs() < TOL);
    }

    #[test]
    fn utm_rejects_bad_zone() {
        assert!(UtmProjection::new(0, Hemisphere::North).is_err());
        assert!(UtmProjection::new(61, Hemisphere::North).is_err());
    }

    #[test]
    fn resolves_epsg_codes() {
        assert!(projection_for("EPSG:4326").is_ok());
        assert!(projection_for("EPSG:3857").is_ok());
        assert!(projection_for("EPSG:32643").is_ok());
        assert!(projection_for("EPSG:32756").is_ok());
        assert!(projection_for("EPSG:2154").is_err());
        assert!(projection_for("32643").is_err());
    }
}
