//! Test utilities for Marga integration tests.
//!
//! Grid fixtures, an exhaustive shortest-path reference and GeoTIFF writers.

#![allow(dead_code)]

use std::collections::BinaryHeap;
use std::io::{Seek, Write};

use marga::core::PixelCoord;
use marga::grid::{AffineTransform, NavigabilityGrid};
use marga::io::FeatureCollection;
use marga::pathfinding::{DIAGONAL_COST, ORTHOGONAL_COST};
use rand::prelude::*;
use tiff::encoder::{TiffEncoder, colortype};
use tiff::tags::Tag;

/// Install a test logger once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Grid from ASCII rows: `.` traversable, anything else blocked.
pub fn grid_from_ascii(rows: &[&str]) -> NavigabilityGrid {
    let height = rows.len();
    let width = rows[0].len();
    let cells = rows
        .iter()
        .flat_map(|r| r.chars().map(|c| u8::from(c == '.')))
        .collect();
    let t = AffineTransform::pixel_space(height, width).unwrap();
    NavigabilityGrid::from_cells(cells, t.into()).unwrap()
}

/// Random grid with roughly `density` obstacles.
pub fn random_grid(height: usize, width: usize, density: f64, seed: u64) -> NavigabilityGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = (0..height * width)
        .map(|_| u8::from(rng.random::<f64>() >= density))
        .collect();
    let t = AffineTransform::pixel_space(height, width).unwrap();
    NavigabilityGrid::from_cells(cells, t.into()).unwrap()
}

#[derive(PartialEq)]
struct Entry(f64, PixelCoord);

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.0.partial_cmp(&self.0).unwrap()
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Exhaustive (Dijkstra) optimal cost with the same move rules as the planner.
pub fn optimal_cost(grid: &NavigabilityGrid, start: PixelCoord, goal: PixelCoord) -> Option<f64> {
    let (h, w) = (grid.height(), grid.width());
    let mut dist = vec![f64::INFINITY; h * w];
    let mut heap = BinaryHeap::new();
    dist[start.row * w + start.col] = 0.0;
    heap.push(Entry(0.0, start));

    while let Some(Entry(d, p)) = heap.pop() {
        if p == goal {
            return Some(d);
        }
        if d > dist[p.row * w + p.col] {
            continue;
        }
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let Some(n) = p.offset(dr, dc, h, w) else {
                    continue;
                };
                if !grid.is_traversable(n) {
                    continue;
                }
                let step = if dr != 0 && dc != 0 {
                    DIAGONAL_COST
                } else {
                    ORTHOGONAL_COST
                };
                let nd = d + step;
                if nd < dist[n.row * w + n.col] {
                    dist[n.row * w + n.col] = nd;
                    heap.push(Entry(nd, n));
                }
            }
        }
    }
    None
}

/// Feature collection of points.
pub fn point_features(points: &[(f64, f64)]) -> FeatureCollection {
    let features = points
        .iter()
        .map(|&(x, y)| {
            format!(
                r#"{{"type": "Feature", "properties": {{}}, "geometry": {{"type": "Point", "coordinates": [{x:?}, {y:?}]}}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    FeatureCollection::from_json(&format!(
        r#"{{"type": "FeatureCollection", "features": [{features}]}}"#
    ))
    .unwrap()
}

/// Write an 8-bit RGB GeoTIFF with a north-up georeference and an EPSG code.
pub fn write_rgb_geotiff<W: Write + Seek>(
    writer: W,
    width: u32,
    height: u32,
    rgb: &[u8],
    origin: (f64, f64),
    pixel_size: f64,
    epsg: u16,
) {
    let mut encoder = TiffEncoder::new(writer).unwrap();
    let mut image = encoder
        .new_image::<colortype::RGB8>(width, height)
        .unwrap();
    write_georeference(image.encoder(), origin, pixel_size, epsg);
    image.write_data(rgb).unwrap();
}

/// Write a four-sample (RGB + alpha) 8-bit GeoTIFF.
pub fn write_rgba_geotiff<W: Write + Seek>(
    writer: W,
    width: u32,
    height: u32,
    rgba: &[u8],
    origin: (f64, f64),
    pixel_size: f64,
    epsg: u16,
) {
    let mut encoder = TiffEncoder::new(writer).unwrap();
    let mut image = encoder
        .new_image::<colortype::RGBA8>(width, height)
        .unwrap();
    write_georeference(image.encoder(), origin, pixel_size, epsg);
    image.write_data(rgba).unwrap();
}

/// Write a single-band 16-bit GeoTIFF.
pub fn write_gray16_geotiff<W: Write + Seek>(
    writer: W,
    width: u32,
    height: u32,
    values: &[u16],
    origin: (f64, f64),
    pixel_size: f64,
    epsg: u16,
) {
    let mut encoder = TiffEncoder::new(writer).unwrap();
    let mut image = encoder
        .new_image::<colortype::Gray16>(width, height)
        .unwrap();
    write_georeference(image.encoder(), origin, pixel_size, epsg);
    image.write_data(values).unwrap();
}

fn write_georeference<W: Write + Seek, K: tiff::encoder::TiffKind>(
    dir: &mut tiff::encoder::DirectoryEncoder<'_, W, K>,
    origin: (f64, f64),
    pixel_size: f64,
    epsg: u16,
) {
    let scale = [pixel_size, pixel_size, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, origin.0, origin.1, 0.0];
    // Geographic key for 4326, projected key otherwise
    let key = if epsg == 4326 { 2048 } else { 3072 };
    let geokeys: [u16; 8] = [1, 1, 0, 1, key, 0, 1, epsg];
    dir.write_tag(Tag::Unknown(33550), &scale[..]).unwrap();
    dir.write_tag(Tag::Unknown(33922), &tiepoint[..]).unwrap();
    dir.write_tag(Tag::Unknown(34735), &geokeys[..]).unwrap();
}
