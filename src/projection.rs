//! Coordinate reference systems and reprojection.
//!
//! Wraps `proj4rs` (pure Rust) behind a small [`Crs`] identifier and a
//! reusable [`CrsTransformer`]. CRS identifiers accept `EPSG:<code>`,
//! `urn:ogc:def:crs:EPSG::<code>`, `CRS84`, or a raw `+proj=...` string.
//!
//! proj4rs works in radians for geographic systems; the transformer does the
//! degree/radian conversion on both ends.

use std::fmt;
use std::str::FromStr;

use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

/// EPSG code of WGS84 geographic coordinates.
pub const EPSG_WGS84: u32 = 4326;

/// EPSG code of Web Mercator.
pub const EPSG_WEB_MERCATOR: u32 = 3857;

const WGS84_PROJ: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Proj string for a supported EPSG code.
///
/// Covers WGS84, Web Mercator, the polar stereographic systems used for sea
/// ice products, and the WGS84 UTM zones.
pub fn proj_string_for_epsg(code: u32) -> Option<String> {
    let fixed = match code {
        4326 => WGS84_PROJ,
        3857 | 900913 => {
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"
        }
        // NSIDC Sea Ice Polar Stereographic North / South
        3413 => "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        3976 => "+proj=stere +lat_0=-90 +lat_ts=-70 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        // Arctic / Antarctic Polar Stereographic
        3995 => "+proj=stere +lat_0=90 +lat_ts=71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        3031 => "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        // NSIDC EASE-Grid 2.0 North
        6931 => "+proj=laea +lat_0=90 +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        32601..=32660 => {
            return Some(format!(
                "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
                code - 32600
            ))
        }
        32701..=32760 => {
            return Some(format!(
                "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
                code - 32700
            ))
        }
        _ => return None,
    };
    Some(fixed.to_string())
}

/// A coordinate reference system identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    epsg: Option<u32>,
    proj: String,
}

impl Crs {
    /// WGS84 longitude/latitude.
    pub fn wgs84() -> Self {
        Self {
            epsg: Some(EPSG_WGS84),
            proj: WGS84_PROJ.to_string(),
        }
    }

    /// CRS from a supported EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self> {
        let proj = proj_string_for_epsg(code)
            .ok_or_else(|| RouteError::input(format!("EPSG:{code} not supported")))?;
        Ok(Self {
            epsg: Some(code),
            proj,
        })
    }

    /// EPSG code, when the CRS was built from one.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Underlying proj string.
    pub fn proj_string(&self) -> &str {
        &self.proj
    }

    /// True for longitude/latitude systems (degrees).
    pub fn is_geographic(&self) -> bool {
        self.proj.contains("+proj=longlat") || self.proj.contains("+proj=latlong")
    }

    /// True when this is WGS84 geographic coordinates.
    pub fn is_wgs84(&self) -> bool {
        self.epsg == Some(EPSG_WGS84) || self.proj == WGS84_PROJ
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl FromStr for Crs {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with('+') {
            return Ok(Self {
                epsg: None,
                proj: s.to_string(),
            });
        }
        let upper = s.to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Self::wgs84());
        }
        // "EPSG:3413", "urn:ogc:def:crs:EPSG::3413", "urn:ogc:def:crs:EPSG:6.6:3413"
        if let Some(idx) = upper.find("EPSG:") {
            let code = upper[idx + 5..]
                .rsplit(':')
                .next()
                .and_then(|c| c.parse::<u32>().ok())
                .ok_or_else(|| RouteError::input(format!("unrecognized CRS identifier '{s}'")))?;
            return Self::from_epsg(code);
        }
        Err(RouteError::input(format!("unrecognized CRS identifier '{s}'")))
    }
}

impl TryFrom<String> for Crs {
    type Error = RouteError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg {
            Some(code) => write!(f, "EPSG:{code}"),
            None => f.write_str(&self.proj),
        }
    }
}

/// Reusable transformer between two coordinate reference systems.
pub struct CrsTransformer {
    source: Crs,
    target: Crs,
    source_proj: Proj,
    target_proj: Proj,
}

impl fmt::Debug for CrsTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrsTransformer")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl CrsTransformer {
    /// Build a transformer between two CRS.
    pub fn new(source: &Crs, target: &Crs) -> Result<Self> {
        let source_proj = Proj::from_proj_string(source.proj_string()).map_err(|e| {
            RouteError::computation(format!("invalid source projection {source}: {e:?}"))
        })?;
        let target_proj = Proj::from_proj_string(target.proj_string()).map_err(|e| {
            RouteError::computation(format!("invalid target projection {target}: {e:?}"))
        })?;
        Ok(Self {
            source: source.clone(),
            target: target.clone(),
            source_proj,
            target_proj,
        })
    }

    /// Source CRS.
    pub fn source(&self) -> &Crs {
        &self.source
    }

    /// Target CRS.
    pub fn target(&self) -> &Crs {
        &self.target
    }

    /// Transform one coordinate pair (x/lon, y/lat order).
    pub fn transform(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if self.source == self.target {
            return Ok((x, y));
        }
        let (in_x, in_y) = if self.source.is_geographic() {
            (x.to_radians(), y.to_radians())
        } else {
            (x, y)
        };
        let mut point = (in_x, in_y, 0.0);
        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            RouteError::computation(format!(
                "reprojection {} -> {} failed for ({x}, {y}): {e:?}",
                self.source, self.target
            ))
        })?;
        let (out_x, out_y) = if self.target.is_geographic() {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        };
        if !out_x.is_finite() || !out_y.is_finite() {
            return Err(RouteError::computation(format!(
                "reprojection {} -> {} produced a non-finite coordinate for ({x}, {y})",
                self.source, self.target
            )));
        }
        Ok((out_x, out_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("EPSG:4326".parse::<Crs>().unwrap(), Crs::wgs84());
        assert_eq!(
            "urn:ogc:def:crs:EPSG::3413".parse::<Crs>().unwrap().epsg(),
            Some(3413)
        );
        assert!("urn:ogc:def:crs:OGC:1.3:CRS84"
            .parse::<Crs>()
            .unwrap()
            .is_wgs84());
        assert!("+proj=longlat +ellps=WGS84"
            .parse::<Crs>()
            .unwrap()
            .is_geographic());
        assert!("EPSG:99999".parse::<Crs>().is_err());
        assert!("mercator".parse::<Crs>().is_err());
    }

    #[test]
    fn test_utm_zone_strings() {
        let north = proj_string_for_epsg(32633).unwrap();
        assert!(north.contains("+zone=33") && !north.contains("+south"));
        let south = proj_string_for_epsg(32719).unwrap();
        assert!(south.contains("+zone=19") && south.contains("+south"));
    }

    #[test]
    fn test_identity_transform() {
        let t = CrsTransformer::new(&Crs::wgs84(), &Crs::wgs84()).unwrap();
        assert_eq!(t.transform(12.5, -7.25).unwrap(), (12.5, -7.25));
    }

    #[test]
    fn test_web_mercator_roundtrip() {
        let merc = Crs::from_epsg(EPSG_WEB_MERCATOR).unwrap();
        let fwd = CrsTransformer::new(&Crs::wgs84(), &merc).unwrap();
        let inv = CrsTransformer::new(&merc, &Crs::wgs84()).unwrap();

        let (x, y) = fwd.transform(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

        // 180 degrees of longitude maps to half the equatorial circumference
        let (x, _) = fwd.transform(180.0, 0.0).unwrap();
        assert_relative_eq!(x, 20_037_508.342789244, epsilon = 1e-3);

        let (x, y) = fwd.transform(-45.0, 72.0).unwrap();
        let (lon, lat) = inv.transform(x, y).unwrap();
        assert_relative_eq!(lon, -45.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 72.0, epsilon = 1e-9);
    }

    #[test]
    fn test_serde_as_string() {
        let crs: Crs = serde_yaml::from_str("EPSG:3413").unwrap();
        assert_eq!(crs.epsg(), Some(3413));
        assert_eq!(serde_yaml::to_string(&crs).unwrap().trim(), "EPSG:3413");
    }
}
