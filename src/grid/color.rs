//! Color-classification strategy for RGB imagery.
//!
//! Each pixel is classified on its own:
//!
//! ```text
//! blue_ratio = b / ((r + g) / 2 + 1e-6)
//! water      = blue_ratio >= blue_ratio_threshold && b >= blue_min
//! ice        = r >= ice_brightness && g >= ice_brightness && b >= ice_brightness
//! ```
//!
//! Only water feeds the grid. One cell per pixel, row 0 is the top image row,
//! and the grid transform is the raster's own georeference.

use image::RgbImage;
use log::info;

use crate::error::{Result, RouteError};
use crate::io::GeoRaster;

use super::strategy::NavigabilityStrategy;
use super::NavigabilityGrid;

/// Color classification thresholds.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorThresholds {
    /// Minimum blue / mean(red, green) ratio for water.
    pub blue_ratio: f32,
    /// Minimum absolute blue value for water.
    pub blue_min: u8,
    /// Minimum value of every channel for ice.
    pub ice_brightness: u8,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        Self {
            blue_ratio: 1.2,
            blue_min: 80,
            ice_brightness: 220,
        }
    }
}

/// Classification of a single pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelClass {
    pub water: bool,
    pub ice: bool,
}

/// Classify one RGB pixel.
#[inline]
pub fn classify_pixel(rgb: [u8; 3], thresholds: &ColorThresholds) -> PixelClass {
    let [r, g, b] = rgb;
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let blue_ratio = bf / ((rf + gf) / 2.0 + 1e-6);
    PixelClass {
        water: blue_ratio >= thresholds.blue_ratio && b >= thresholds.blue_min,
        ice: r >= thresholds.ice_brightness
            && g >= thresholds.ice_brightness
            && b >= thresholds.ice_brightness,
    }
}

/// Row-major water and ice masks of an image.
#[derive(Clone, Debug)]
pub struct ClassifiedPixels {
    pub height: usize,
    pub width: usize,
    pub water: Vec<bool>,
    pub ice: Vec<bool>,
}

impl ClassifiedPixels {
    /// Fraction of pixels classified as water.
    pub fn water_fraction(&self) -> f64 {
        fraction(&self.water)
    }

    /// Fraction of pixels classified as ice.
    pub fn ice_fraction(&self) -> f64 {
        fraction(&self.ice)
    }
}

fn fraction(mask: &[bool]) -> f64 {
    if mask.is_empty() {
        0.0
    } else {
        mask.iter().filter(|&&m| m).count() as f64 / mask.len() as f64
    }
}

/// Classify every pixel of an image.
pub fn classify_pixels(image: &RgbImage, thresholds: &ColorThresholds) -> ClassifiedPixels {
    let n = image.width() as usize * image.height() as usize;
    let mut water = Vec::with_capacity(n);
    let mut ice = Vec::with_capacity(n);
    // `pixels()` walks row-major, matching the grid layout
    for px in image.pixels() {
        let class = classify_pixel(px.0, thresholds);
        water.push(class.water);
        ice.push(class.ice);
    }
    ClassifiedPixels {
        height: image.height() as usize,
        width: image.width() as usize,
        water,
        ice,
    }
}

/// Raster grid builder: open water is traversable.
#[derive(Clone, Debug, Default)]
pub struct ColorClassificationStrategy {
    thresholds: ColorThresholds,
}

impl ColorClassificationStrategy {
    /// Create a strategy with the given thresholds.
    pub fn new(thresholds: ColorThresholds) -> Self {
        Self { thresholds }
    }

    /// Classification thresholds.
    pub fn thresholds(&self) -> &ColorThresholds {
        &self.thresholds
    }
}

impl NavigabilityStrategy for ColorClassificationStrategy {
    type Input = GeoRaster;

    fn name(&self) -> &'static str {
        "color-classification"
    }

    fn build(&self, raster: &GeoRaster) -> Result<NavigabilityGrid> {
        if raster.height() == 0 || raster.width() == 0 {
            return Err(RouteError::input("raster has zero size"));
        }
        let transform = raster.transform()?;
        let classes = classify_pixels(&raster.image, &self.thresholds);

        let cells = classes
            .water
            .iter()
            .map(|&w| {
                if w {
                    NavigabilityGrid::TRAVERSABLE
                } else {
                    NavigabilityGrid::OBSTACLE
                }
            })
            .collect();
        let grid = NavigabilityGrid::from_cells(cells, transform.into())?;

        info!(
            "[GridBuilder] {}: {}x{} raster, water {:.1}%, ice {:.1}%",
            self.name(),
            grid.height(),
            grid.width(),
            classes.water_fraction() * 100.0,
            classes.ice_fraction() * 100.0
        );
        Ok(grid)
    }
}
