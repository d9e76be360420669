//! Input and output formats.
//!
//! - [`geojson`]: GeoJSON wire types for requests, responses and corridors
//! - [`raster`]: GeoTIFF / image loading for the color-classification pipeline
//! - [`write_route_geojson`]: save a planned route to disk

pub mod geojson;
pub mod raster;

pub use geojson::{Feature, FeatureCollection, Geometry, Position};
pub use raster::{GeoRaster, GeoReference, decode_geotiff, read_geotiff, read_raster};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::error::{Result, RouteError};
use crate::route::RoutePlan;

/// Write a planned route as a GeoJSON feature collection.
pub fn write_route_geojson(path: &Path, plan: &RoutePlan) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        RouteError::computation_with(format!("cannot create {}", path.display()), e)
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &plan.to_feature_collection())?;
    writer.flush()?;
    info!(
        "[Export] wrote {} route points to {}",
        plan.route.points.len(),
        path.display()
    );
    Ok(())
}
