//! Raster part construction from bitmap images
//!
//! Converts an image into a bilevel [`RasterPart`] (thresholded) or a
//! grayscale [`Raster3dPart`]. Dark pixels burn: luma 0 maps to full
//! intensity, luma 255 to blank, unless `invert` flips the mapping.
//! The image is grayscaled and resized to the requested physical width
//! at the part resolution before sampling.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use kerf_core::job::{LaserProperty, Point, Raster3dPart, RasterPart};
use kerf_core::units;
use kerf_core::{Error, Result};

/// Parameters controlling bitmap import.
#[derive(Debug, Clone)]
pub struct BitmapImportParams {
    /// Output width in millimetres.
    pub width_mm: f64,
    /// Output height in millimetres; derived from the aspect ratio if unset.
    pub height_mm: Option<f64>,
    /// Part resolution in dots per inch.
    pub dpi: f64,
    /// Luma cutoff for the bilevel variant: pixels darker than this burn.
    pub threshold: u8,
    /// Swap the dark/light mapping.
    pub invert: bool,
}

impl Default for BitmapImportParams {
    fn default() -> Self {
        Self {
            width_mm: 100.0,
            height_mm: None,
            dpi: 500.0,
            threshold: 128,
            invert: false,
        }
    }
}

fn prepare(img: &DynamicImage, params: &BitmapImportParams) -> Result<GrayImage> {
    let mut gray = img.to_luma8();
    if gray.width() == 0 || gray.height() == 0 {
        return Err(Error::config("image has no pixels"));
    }

    let out_width = units::mm_to_px(params.width_mm, params.dpi) as u32;
    if out_width == 0 {
        return Err(Error::config(format!(
            "output width {}mm at {}dpi is less than one pixel",
            params.width_mm, params.dpi
        )));
    }
    let aspect = gray.height() as f64 / gray.width() as f64;
    let out_height = match params.height_mm {
        Some(h) => units::mm_to_px(h, params.dpi) as u32,
        None => (out_width as f64 * aspect) as u32,
    }
    .max(1);

    if (out_width, out_height) != gray.dimensions() {
        gray = image::imageops::resize(&gray, out_width, out_height, FilterType::Lanczos3);
    }
    if params.invert {
        image::imageops::invert(&mut gray);
    }
    Ok(gray)
}

/// Build a bilevel raster part from an image.
pub fn raster_part_from_image(
    img: &DynamicImage,
    params: &BitmapImportParams,
    start: Point,
    property: LaserProperty,
) -> Result<RasterPart> {
    let gray = prepare(img, params)?;
    let mut part = RasterPart::new(start, gray.width(), gray.height(), params.dpi, property);
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel.0[0] < params.threshold {
            part.set_black(x, y);
        }
    }
    tracing::debug!(
        width = part.width(),
        height = part.height(),
        "bilevel raster imported"
    );
    Ok(part)
}

/// Build a grayscale raster part from an image.
pub fn raster3d_part_from_image(
    img: &DynamicImage,
    params: &BitmapImportParams,
    start: Point,
    property: LaserProperty,
) -> Result<Raster3dPart> {
    let gray = prepare(img, params)?;
    let width = gray.width();
    // dark pixels burn: intensity is inverted luma
    let samples: Vec<u8> = gray.pixels().map(|p| 255 - p.0[0]).collect();
    tracing::debug!(width, height = gray.height(), "grayscale raster imported");
    Ok(Raster3dPart::from_samples(
        start, width, params.dpi, property, samples,
    ))
}
