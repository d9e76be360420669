//! Raster loading for the color-classification pipeline.
//!
//! GeoTIFFs are decoded with `tiff`, reduced to 8-bit RGB and paired with
//! their georeference (affine coefficients + native CRS). Other image formats
//! go through `image` and get a pixel-space georeference.
//!
//! ## 8-bit normalization
//!
//! | Source | Rule |
//! |--------|------|
//! | float band | NaN and ±inf → 0, subtract band minimum, scale band maximum to 255 |
//! | integer band | scale by band maximum only when it exceeds 255 |
//! | single band | `clip(v / max * 255, 0, 255)`, replicated to R, G, B |

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use image::RgbImage;
use log::{debug, info};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;

use crate::core::{GeoPoint, PixelCoord};
use crate::error::{Result, RouteError};
use crate::grid::AffineTransform;
use crate::projection::Crs;

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;

const GEOKEY_GEOGRAPHIC_TYPE: u32 = 2048;
const GEOKEY_PROJECTED_CS_TYPE: u32 = 3072;
/// GeoKey value meaning "user defined".
const GEOKEY_USER_DEFINED: u32 = 32767;

/// Raster georeference: GDAL-ordered affine plus native CRS.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoReference {
    /// Affine coefficients `[c, a, b, f, d, e]`.
    pub coefficients: [f64; 6],
    /// Native CRS. `None` means the affine already yields the working coordinates.
    pub crs: Option<Crs>,
}

impl GeoReference {
    /// Pixel-space georeference (identity affine, no CRS).
    pub fn pixel_space() -> Self {
        Self {
            coefficients: [0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            crs: None,
        }
    }

    /// North-up georeference from an upper-left corner and pixel size.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64, crs: Option<Crs>) -> Self {
        Self {
            coefficients: [origin_x, pixel_width, 0.0, origin_y, 0.0, -pixel_height],
            crs,
        }
    }

    /// Build the transform for a raster of the given size.
    pub fn to_transform(&self, height: usize, width: usize) -> Result<AffineTransform> {
        AffineTransform::new(self.coefficients, self.crs.clone(), height, width)
    }
}

/// An 8-bit RGB image with its georeference.
#[derive(Clone, Debug)]
pub struct GeoRaster {
    pub image: RgbImage,
    pub georef: GeoReference,
}

impl GeoRaster {
    /// Pair an image with a georeference.
    pub fn new(image: RgbImage, georef: GeoReference) -> Self {
        Self { image, georef }
    }

    /// Raster height in pixels.
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Raster width in pixels.
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Affine transform for this raster.
    pub fn transform(&self) -> Result<AffineTransform> {
        self.georef.to_transform(self.height(), self.width())
    }

    /// Pixel containing a WGS84 point, `None` when the point falls outside.
    pub fn pixel_at(&self, g: GeoPoint) -> Result<Option<PixelCoord>> {
        self.transform()?.geo_to_pixel_checked(g)
    }
}

/// Read a raster from disk. `.tif`/`.tiff` files keep their georeference.
pub fn read_raster(path: &Path) -> Result<GeoRaster> {
    let is_tiff = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false);
    if is_tiff {
        read_geotiff(path)
    } else {
        let image = image::open(path)?.to_rgb8();
        debug!(
            "[Raster] {}: {}x{} image without georeference",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(GeoRaster::new(image, GeoReference::pixel_space()))
    }
}

/// Read a GeoTIFF file.
pub fn read_geotiff(path: &Path) -> Result<GeoRaster> {
    let file = File::open(path).map_err(|e| {
        RouteError::computation_with(format!("cannot open raster {}", path.display()), e)
    })?;
    let raster = decode_geotiff(BufReader::new(file))?;
    info!(
        "[Raster] {}: {}x{} pixels, crs={}",
        path.display(),
        raster.width(),
        raster.height(),
        raster
            .georef
            .crs
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    Ok(raster)
}

/// Decode a GeoTIFF from any seekable reader.
pub fn decode_geotiff<R: Read + Seek>(reader: R) -> Result<GeoRaster> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    if width == 0 || height == 0 {
        return Err(RouteError::input("raster has zero size"));
    }
    let samples = samples_per_pixel(decoder.colortype()?)?;
    let georef = read_georeference(&mut decoder)?;

    let (data, is_float) = decoding_to_f64(decoder.read_image()?)?;
    let pixels = width as usize * height as usize;
    if data.len() < pixels * samples {
        return Err(RouteError::computation(format!(
            "raster holds {} samples, expected {}",
            data.len(),
            pixels * samples
        )));
    }

    let band = |b: usize| -> Vec<f64> { (0..pixels).map(|i| data[i * samples + b]).collect() };

    let rgb: [Vec<u8>; 3] = if samples >= 3 {
        [
            normalize_band(band(0), is_float),
            normalize_band(band(1), is_float),
            normalize_band(band(2), is_float),
        ]
    } else {
        let gray = normalize_single_band(band(0));
        [gray.clone(), gray.clone(), gray]
    };

    let mut buf = Vec::with_capacity(pixels * 3);
    for i in 0..pixels {
        buf.extend_from_slice(&[rgb[0][i], rgb[1][i], rgb[2][i]]);
    }
    let image = RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| RouteError::computation("RGB buffer size mismatch"))?;

    Ok(GeoRaster::new(
        image,
        georef.unwrap_or_else(GeoReference::pixel_space),
    ))
}

fn samples_per_pixel(color: ColorType) -> Result<usize> {
    match color {
        ColorType::Gray(_) => Ok(1),
        ColorType::GrayA(_) => Ok(2),
        ColorType::RGB(_) => Ok(3),
        ColorType::RGBA(_) => Ok(4),
        ColorType::Multiband { num_samples, .. } => Ok(num_samples as usize),
        other => Err(RouteError::computation(format!(
            "unsupported raster color type {other:?}"
        ))),
    }
}

/// Widen decoded samples to f64. The flag is true for floating-point sources.
fn decoding_to_f64(result: DecodingResult) -> Result<(Vec<f64>, bool)> {
    fn widen<T: Copy + Into<f64>>(v: Vec<T>) -> Vec<f64> {
        v.into_iter().map(Into::into).collect()
    }
    let widened = match result {
        DecodingResult::U8(v) => (widen(v), false),
        DecodingResult::U16(v) => (widen(v), false),
        DecodingResult::U32(v) => (widen(v), false),
        DecodingResult::U64(v) => (v.into_iter().map(|x| x as f64).collect(), false),
        DecodingResult::I8(v) => (widen(v), false),
        DecodingResult::I16(v) => (widen(v), false),
        DecodingResult::I32(v) => (widen(v), false),
        DecodingResult::I64(v) => (v.into_iter().map(|x| x as f64).collect(), false),
        DecodingResult::F32(v) => (widen(v), true),
        DecodingResult::F64(v) => (v, true),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(RouteError::computation(
                "unsupported raster sample format",
            ))
        }
    };
    Ok(widened)
}

/// Reduce one band of a multi-band raster to 8 bits.
pub(crate) fn normalize_band(mut values: Vec<f64>, is_float: bool) -> Vec<u8> {
    if is_float {
        for v in values.iter_mut() {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        for v in values.iter_mut() {
            *v -= min;
        }
        let max = values.iter().copied().fold(0.0, f64::max);
        if max == 0.0 {
            return vec![0; values.len()];
        }
        values.iter().map(|v| to_u8(v / max * 255.0)).collect()
    } else {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 255.0 {
            values.iter().map(|v| to_u8(v / max * 255.0)).collect()
        } else {
            values.iter().map(|&v| to_u8(v)).collect()
        }
    }
}

/// Reduce a single-band raster to 8 bits: `clip(v / max * 255, 0, 255)`.
pub(crate) fn normalize_single_band(values: Vec<f64>) -> Vec<u8> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !(max > 0.0) {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| if v.is_finite() { to_u8(v / max * 255.0) } else { 0 })
        .collect()
}

/// Truncating conversion clamped into the byte range.
#[inline]
fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

fn find_f64_tag<R: Read + Seek>(decoder: &mut Decoder<R>, tag: u16) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(tag))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

/// Georeference from GeoTIFF tags, `None` when the file carries none.
fn read_georeference<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoReference>> {
    let coefficients = if let Some(m) = find_f64_tag(decoder, TAG_MODEL_TRANSFORMATION)? {
        if m.len() < 8 {
            return Err(RouteError::computation(
                "ModelTransformation tag holds fewer than 8 values",
            ));
        }
        // Row-major 4x4: x = m0*col + m1*row + m3, y = m4*col + m5*row + m7
        [m[3], m[0], m[1], m[7], m[4], m[5]]
    } else {
        let scale = find_f64_tag(decoder, TAG_MODEL_PIXEL_SCALE)?;
        let tiepoint = find_f64_tag(decoder, TAG_MODEL_TIEPOINT)?;
        match (scale, tiepoint) {
            (Some(s), Some(t)) if s.len() >= 2 && t.len() >= 6 => {
                let (sx, sy) = (s[0], s[1]);
                let (i, j, x, y) = (t[0], t[1], t[3], t[4]);
                [x - i * sx, sx, 0.0, y + j * sy, 0.0, -sy]
            }
            _ => return Ok(None),
        }
    };

    let crs = match decoder.find_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY))? {
        Some(value) => crs_from_geokeys(&value.into_u32_vec()?)?,
        None => None,
    };

    debug!("[Raster] georeference {:?} crs={:?}", coefficients, crs);
    Ok(Some(GeoReference { coefficients, crs }))
}

/// EPSG code from a GeoKey directory, projected CRS first.
pub(crate) fn crs_from_geokeys(dir: &[u32]) -> Result<Option<Crs>> {
    if dir.len() < 4 {
        return Ok(None);
    }
    let count = dir[3] as usize;
    let lookup = |key: u32| -> Option<u32> {
        dir[4..]
            .chunks_exact(4)
            .take(count)
            .find(|entry| entry[0] == key && entry[1] == 0)
            .map(|entry| entry[3])
    };
    let code = lookup(GEOKEY_PROJECTED_CS_TYPE)
        .filter(|&c| c != GEOKEY_USER_DEFINED)
        .or_else(|| lookup(GEOKEY_GEOGRAPHIC_TYPE).filter(|&c| c != GEOKEY_USER_DEFINED));
    match code {
        Some(code) => Crs::from_epsg(code).map(Some).map_err(|_| {
            RouteError::computation(format!("raster CRS EPSG:{code} is not supported"))
        }),
        None => Ok(None),
    }
}
