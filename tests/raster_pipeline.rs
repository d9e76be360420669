//! GeoTIFF and plain-image loading through to a planned route.

mod common;

use std::fs::File;
use std::io::Cursor;

use approx::assert_relative_eq;
use common::{init_logging, write_gray16_geotiff, write_rgb_geotiff, write_rgba_geotiff};
use image::{Rgb, RgbImage};
use marga::core::{GeoPoint, PixelCoord};
use marga::io::{decode_geotiff, read_raster, GeoReference};
use marga::route::{RouteMethod, RoutePlanner};

const LAND: [u8; 3] = [150, 120, 90];
const WATER: [u8; 3] = [10, 40, 160];

/// 20x10 land raster with a water lead along row 5.
fn lead_pixels(width: u32, height: u32, lead_row: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for row in 0..height {
        for _ in 0..width {
            rgb.extend_from_slice(if row == lead_row { &WATER } else { &LAND });
        }
    }
    rgb
}

#[test]
fn test_wgs84_geotiff_route_follows_lead() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lead.tif");
    write_rgb_geotiff(
        File::create(&path).unwrap(),
        20,
        10,
        &lead_pixels(20, 10, 5),
        (-60.0, 72.0),
        0.1,
        4326,
    );

    let raster = read_raster(&path).unwrap();
    assert_eq!((raster.width(), raster.height()), (20, 10));
    assert_eq!(raster.georef.crs.as_ref().and_then(|c| c.epsg()), Some(4326));
    let [c, a, b, f, d, e] = raster.georef.coefficients;
    assert_relative_eq!(c, -60.0);
    assert_relative_eq!(a, 0.1);
    assert_relative_eq!(b, 0.0);
    assert_relative_eq!(f, 72.0);
    assert_relative_eq!(d, 0.0);
    assert_relative_eq!(e, -0.1);
    assert_eq!(raster.image.get_pixel(3, 5).0, WATER);

    let start = GeoPoint::new(-59.95, 71.45);
    let end = GeoPoint::new(-58.05, 71.45);
    assert_eq!(raster.pixel_at(start).unwrap(), Some(PixelCoord::new(5, 0)));
    assert_eq!(raster.pixel_at(GeoPoint::new(-61.0, 71.45)).unwrap(), None);

    let plan = RoutePlanner::default()
        .plan_raster(&raster, start, end, false)
        .unwrap();
    assert_eq!(plan.route.method, RouteMethod::Astar);
    assert_eq!(plan.route.points.len(), 20);
    for p in &plan.route.points {
        assert_relative_eq!(p.lat, 71.45, epsilon = 1e-9);
    }
}

#[test]
fn test_polar_stereographic_geotiff() {
    init_logging();
    // 1 km pixels starting 1000 km from the pole along the -45 meridian
    let mut cursor = Cursor::new(Vec::new());
    write_rgb_geotiff(
        &mut cursor,
        8,
        8,
        &lead_pixels(8, 8, 2),
        (0.0, -1_000_000.0),
        1000.0,
        3413,
    );
    cursor.set_position(0);

    let raster = decode_geotiff(cursor).unwrap();
    assert_eq!(raster.georef.crs.as_ref().and_then(|c| c.epsg()), Some(3413));

    let transform = raster.transform().unwrap();
    let corner = transform.pixel_to_geo(PixelCoord::new(0, 0)).unwrap();
    assert!(corner.lat > 75.0 && corner.lat < 85.0, "lat = {}", corner.lat);
    assert!((corner.lon + 45.0).abs() < 1.0, "lon = {}", corner.lon);

    let cell = PixelCoord::new(3, 4);
    let g = transform.pixel_to_geo(cell).unwrap();
    assert_eq!(raster.pixel_at(g).unwrap(), Some(cell));

    let start = transform.pixel_to_geo(PixelCoord::new(2, 0)).unwrap();
    let end = transform.pixel_to_geo(PixelCoord::new(2, 7)).unwrap();
    let plan = RoutePlanner::default()
        .plan_raster(&raster, start, end, false)
        .unwrap();
    assert_eq!(plan.route.method, RouteMethod::Astar);
    assert_eq!(plan.route.points.len(), 8);
}

#[test]
fn test_extra_bands_are_ignored() {
    // Fourth sample per pixel must not leak into the RGB channels
    let mut rgba = Vec::new();
    for row in 0..3u8 {
        for _ in 0..5 {
            let rgb = if row == 1 { WATER } else { LAND };
            rgba.extend_from_slice(&rgb);
            rgba.push(7);
        }
    }
    let mut cursor = Cursor::new(Vec::new());
    write_rgba_geotiff(&mut cursor, 5, 3, &rgba, (0.0, 3.0), 1.0, 4326);
    cursor.set_position(0);

    let raster = decode_geotiff(cursor).unwrap();
    assert_eq!((raster.width(), raster.height()), (5, 3));
    assert_eq!(raster.image.get_pixel(2, 1).0, WATER);
    assert_eq!(raster.image.get_pixel(2, 0).0, LAND);

    let plan = RoutePlanner::default()
        .plan_raster(&raster, GeoPoint::new(0.5, 1.5), GeoPoint::new(4.5, 1.5), false)
        .unwrap();
    assert_eq!(plan.route.method, RouteMethod::Astar);
    assert_eq!(plan.route.points.len(), 5);
}

#[test]
fn test_single_band_is_normalized_and_replicated() {
    let mut cursor = Cursor::new(Vec::new());
    let values: [u16; 8] = [0, 500, 1000, 2000, 0, 0, 0, 2000];
    write_gray16_geotiff(&mut cursor, 4, 2, &values, (10.0, 60.0), 0.5, 4326);
    cursor.set_position(0);

    let raster = decode_geotiff(cursor).unwrap();
    assert_eq!(raster.image.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(raster.image.get_pixel(1, 0).0, [63, 63, 63]);
    assert_eq!(raster.image.get_pixel(2, 0).0, [127, 127, 127]);
    assert_eq!(raster.image.get_pixel(3, 0).0, [255, 255, 255]);
    assert_eq!(raster.image.get_pixel(3, 1).0, [255, 255, 255]);
}

#[test]
fn test_png_has_pixel_space_georeference() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.png");
    let mut image = RgbImage::from_pixel(6, 4, Rgb(LAND));
    for x in 0..6 {
        image.put_pixel(x, 3, Rgb(WATER));
    }
    image.save(&path).unwrap();

    let raster = read_raster(&path).unwrap();
    assert_eq!(raster.georef, GeoReference::pixel_space());
    assert_eq!(raster.image, image);

    // Pixel space: (col + 0.5, row + 0.5)
    let plan = RoutePlanner::default()
        .plan_raster(&raster, GeoPoint::new(0.5, 3.5), GeoPoint::new(5.5, 3.5), false)
        .unwrap();
    assert_eq!(plan.route.method, RouteMethod::Astar);
    assert_eq!(plan.route.points.first(), Some(&GeoPoint::new(0.5, 3.5)));
    assert_eq!(plan.route.points.last(), Some(&GeoPoint::new(5.5, 3.5)));
}

#[test]
fn test_missing_file_is_computation_error() {
    let err = read_raster(std::path::Path::new("/nonexistent/scene.tif")).unwrap_err();
    assert!(!err.is_client_error());
}
