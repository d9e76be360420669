//! Corridor containment.
//!
//! Reference geometries are reprojected into a planar working CRS and
//! indexed. The corridor is the union of round buffers of width
//! `buffer_distance` around every part; a point is inside when its distance
//! to the nearest part is at most the buffer distance (boundary included).
//! Points inside a reference polygon are at distance 0.

use std::fs;
use std::path::Path;

use geo::{Coord, Geometry, MapCoords};
use log::{debug, info};

use crate::core::GeoPoint;
use crate::error::{Result, RouteError};
use crate::io::FeatureCollection;
use crate::projection::{Crs, CrsTransformer, EPSG_WEB_MERCATOR};

use super::spatial_index::{CorridorPart, IndexedPart, PartIndex};

/// Corridor parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CorridorConfig {
    /// CRS of the reference geometries unless the file declares one.
    pub source_crs: Crs,
    /// Planar CRS the buffer is applied in.
    pub working_crs: Crs,
    /// Buffer distance in working CRS units.
    pub buffer_distance: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            source_crs: Crs::wgs84(),
            // EPSG:3857 is always in the supported table
            working_crs: Crs::from_epsg(EPSG_WEB_MERCATOR).unwrap_or_default(),
            buffer_distance: 5000.0,
        }
    }
}

/// Read-only buffered union of reference geometries.
#[derive(Debug)]
pub struct CorridorFilter {
    index: PartIndex,
    buffer_distance: f64,
    working_crs: Crs,
    /// WGS84 → working CRS for queries.
    query: CrsTransformer,
}

impl CorridorFilter {
    /// Build a corridor from geometries in `config.source_crs`.
    pub fn new(geometries: Vec<Geometry<f64>>, config: &CorridorConfig) -> Result<Self> {
        if geometries.is_empty() {
            return Err(RouteError::input("corridor source has no geometries"));
        }
        let buffer = config.buffer_distance;
        if !buffer.is_finite() || buffer < 0.0 {
            return Err(RouteError::input(format!(
                "corridor buffer distance must be non-negative, got {buffer}"
            )));
        }

        let to_working = CrsTransformer::new(&config.source_crs, &config.working_crs)?;
        let mut indexed = Vec::new();
        for (feature, geometry) in geometries.into_iter().enumerate() {
            let projected = geometry.try_map_coords(|c| {
                to_working
                    .transform(c.x, c.y)
                    .map(|(x, y)| Coord { x, y })
            })?;
            let mut parts = Vec::new();
            CorridorPart::split(projected, &mut parts);
            for part in parts {
                indexed.push(IndexedPart::new(part, feature)?);
            }
        }
        if indexed.is_empty() {
            return Err(RouteError::input("corridor source has only empty geometries"));
        }

        let index = PartIndex::new(indexed);
        info!(
            "[Corridor] {} parts, buffer {} in {}",
            index.len(),
            buffer,
            config.working_crs
        );
        Ok(Self {
            index,
            buffer_distance: buffer,
            working_crs: config.working_crs.clone(),
            query: CrsTransformer::new(&Crs::wgs84(), &config.working_crs)?,
        })
    }

    /// Build a corridor from a feature collection. A declared `crs` member
    /// overrides `config.source_crs`.
    pub fn from_feature_collection(fc: &FeatureCollection, config: &CorridorConfig) -> Result<Self> {
        let geometries = fc.geometries()?;
        match fc.declared_crs()? {
            Some(declared) => {
                debug!("[Corridor] source declares {}", declared);
                let config = CorridorConfig {
                    source_crs: declared,
                    ..config.clone()
                };
                Self::new(geometries, &config)
            }
            None => Self::new(geometries, config),
        }
    }

    /// Load a corridor from a GeoJSON file.
    pub fn from_file(path: &Path, config: &CorridorConfig) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            RouteError::computation_with(format!("cannot read corridor {}", path.display()), e)
        })?;
        let fc = FeatureCollection::from_json(&json).map_err(|e| match e {
            RouteError::Input(msg) => {
                RouteError::computation(format!("corridor {} is invalid: {msg}", path.display()))
            }
            other => other,
        })?;
        Self::from_feature_collection(&fc, config)
    }

    /// Buffer distance in working CRS units.
    pub fn buffer_distance(&self) -> f64 {
        self.buffer_distance
    }

    /// Planar CRS of the corridor.
    pub fn working_crs(&self) -> &Crs {
        &self.working_crs
    }

    /// Number of indexed parts.
    pub fn part_count(&self) -> usize {
        self.index.len()
    }

    /// Containment test for a WGS84 point.
    ///
    /// A point the working CRS cannot represent (a pole in Web Mercator) is
    /// outside the corridor.
    pub fn contains(&self, g: GeoPoint) -> Result<bool> {
        match self.query.transform(g.lon, g.lat) {
            Ok((x, y)) => Ok(self.contains_working(x, y)),
            Err(e) => {
                debug!("[Corridor] ({}, {}) not representable: {}", g.lon, g.lat, e);
                Ok(false)
            }
        }
    }

    /// Containment test for a point already in the working CRS.
    pub fn contains_working(&self, x: f64, y: f64) -> bool {
        self.index.any_within(x, y, self.buffer_distance)
    }

    /// Distance from a WGS84 point to the nearest reference part, in working units.
    ///
    /// Infinite for points the working CRS cannot represent.
    pub fn distance_to(&self, g: GeoPoint) -> Result<f64> {
        let Ok((x, y)) = self.query.transform(g.lon, g.lat) else {
            return Ok(f64::INFINITY);
        };
        Ok(self
            .index
            .nearest(x, y)
            .map(|(_, d)| d)
            .unwrap_or(f64::INFINITY))
    }

    /// Number of points outside the corridor.
    pub fn count_outside(&self, points: &[GeoPoint]) -> Result<usize> {
        let mut outside = 0;
        for &p in points {
            if !self.contains(p)? {
                outside += 1;
            }
        }
        Ok(outside)
    }
}
