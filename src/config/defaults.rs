//! Default value functions for serde deserialization.

use crate::projection::{Crs, EPSG_WEB_MERCATOR};

pub fn grid_size() -> usize {
    200
}

pub fn distance_threshold() -> f64 {
    0.02
}

pub fn blue_ratio_threshold() -> f32 {
    1.2
}

pub fn blue_min() -> u8 {
    80
}

pub fn ice_brightness_threshold() -> u8 {
    220
}

pub fn fallback_points() -> usize {
    50
}

pub fn source_crs() -> Crs {
    Crs::wgs84()
}

pub fn working_crs() -> Crs {
    Crs::from_epsg(EPSG_WEB_MERCATOR).unwrap_or_default()
}

pub fn buffer_distance() -> f64 {
    5000.0
}
