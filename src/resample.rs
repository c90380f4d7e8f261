use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage, RgbaImage};

use crate::raster::Raster;

/// Interpolation used for every resize. Catmull-Rom is the bicubic kernel.
const FILTER: FilterType = FilterType::CatmullRom;

/// Errors from [`resample`] / [`Resampler::resample`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    /// The requested width or height is zero.
    #[error("invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    /// The source image has no pixels.
    #[error("source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
}

/// Resize `source` to exactly `width` x `height`.
///
/// Shorthand for `Resampler::new(source)?.resample(width, height)`. When
/// producing several sizes from one source, build a [`Resampler`] once.
///
/// # Example
///
/// ```rust
/// use icon_forge::raster::Raster;
/// use icon_forge::resample::resample;
/// use image::{Rgba, RgbaImage};
///
/// let source = Raster::new(RgbaImage::from_pixel(64, 64, Rgba([0, 128, 255, 255])));
/// let small = resample(&source, 16, 16).unwrap();
/// assert_eq!((small.width(), small.height()), (16, 16));
/// ```
pub fn resample(source: &Raster, width: u32, height: u32) -> Result<Raster, ResampleError> {
    Resampler::new(source)?.resample(width, height)
}

/// A source image prepared for repeated resizing.
///
/// Colour is filtered in premultiplied-alpha space: fully transparent pixels
/// contribute nothing to their neighbours, so edges of a cut-out shape keep
/// their colour instead of picking up a dark fringe. Samples beyond the
/// border are clamped to the edge pixels.
///
/// The premultiplied buffer is built once in [`Resampler::new`] and shared
/// by every call to [`Resampler::resample`], which takes `&self` and can run
/// from several threads.
#[derive(Debug)]
pub struct Resampler<'a> {
    source: &'a Raster,
    premultiplied: Rgba32FImage,
}

impl<'a> Resampler<'a> {
    pub fn new(source: &'a Raster) -> Result<Self, ResampleError> {
        if source.is_empty() {
            return Err(ResampleError::EmptySource {
                width: source.width(),
                height: source.height(),
            });
        }

        Ok(Self {
            source,
            premultiplied: premultiply(source.pixels()),
        })
    }

    /// Produce a new image of exactly `width` x `height`.
    ///
    /// At the source's own size the filter pass is skipped (it would be the
    /// identity), but alpha normalisation still runs, so the result is the
    /// same as the general path: fully transparent pixels come out as
    /// `[0, 0, 0, 0]`.
    pub fn resample(&self, width: u32, height: u32) -> Result<Raster, ResampleError> {
        if width == 0 || height == 0 {
            return Err(ResampleError::InvalidTarget { width, height });
        }

        let pixels = if (width, height) == self.premultiplied.dimensions() {
            unpremultiply(&self.premultiplied)
        } else {
            unpremultiply(&imageops::resize(&self.premultiplied, width, height, FILTER))
        };

        Ok(Raster::new(pixels).with_resolution(self.source.resolution()))
    }
}

fn premultiply(pixels: &RgbaImage) -> Rgba32FImage {
    Rgba32FImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let channel = |c: u8| f32::from(c) / 255.0 * alpha;
        Rgba([channel(r), channel(g), channel(b), alpha])
    })
}

fn unpremultiply(pixels: &Rgba32FImage) -> RgbaImage {
    RgbaImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let alpha = to_u8(a);
        if alpha == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        Rgba([to_u8(r / a), to_u8(g / a), to_u8(b / a), alpha])
    })
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
