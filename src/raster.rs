use image::{DynamicImage, RgbaImage};
use std::fs;
use std::path::Path;

/// Screen resolution assumed when the source carries no DPI information.
pub const DEFAULT_DPI: f32 = 96.0;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const INCHES_PER_METRE: f32 = 0.0254;

/// Horizontal and vertical resolution of an image, in dots per inch.
///
/// The ICO format ignores this; it is carried through resampling so callers
/// that care (e.g. when exporting individual PNGs) can keep it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            horizontal: DEFAULT_DPI,
            vertical: DEFAULT_DPI,
        }
    }
}

/// A decoded RGBA8 image plus its resolution metadata.
///
/// This is the input to the [`Resampler`](crate::resample::Resampler) and the
/// [`IconEncoder`](crate::encoder::IconEncoder). Decoding the original file
/// (PNG, JPEG, WebP, ...) happens before a `Raster` is built.
///
/// # Example
///
/// ```rust
/// use icon_forge::raster::Raster;
/// use image::{Rgba, RgbaImage};
///
/// let pixels = RgbaImage::from_pixel(32, 32, Rgba([255, 0, 0, 255]));
/// let raster = Raster::new(pixels);
/// assert_eq!((raster.width(), raster.height()), (32, 32));
/// assert!(!raster.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pixels: RgbaImage,
    resolution: Resolution,
}

impl Raster {
    /// Wrap an RGBA8 buffer using the default resolution.
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            resolution: Resolution::default(),
        }
    }

    /// Replace the resolution metadata.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Decode an image file from disk, converting it to RGBA8.
    ///
    /// The format is detected from the file contents. A PNG `pHYs` chunk in
    /// metres sets the resolution; every other source gets [`DEFAULT_DPI`].
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        let bytes = fs::read(path)?;
        let decoded = image::load_from_memory(&bytes)?;
        let resolution = png_resolution(&bytes).unwrap_or_default();
        log::debug!(
            "Decoded {} ({}x{}, {:?}, {:.0}x{:.0} dpi)",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color(),
            resolution.horizontal,
            resolution.vertical
        );
        Ok(Self::from(decoded).with_resolution(resolution))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbaImage {
        self.pixels
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl From<RgbaImage> for Raster {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

impl From<DynamicImage> for Raster {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.into_rgba8())
    }
}

/// Resolution from the `pHYs` chunk of a PNG stream.
///
/// `None` for non-PNG data, a missing chunk, an unspecified unit (aspect
/// ratio only) or zero density. Only chunks before the image data are
/// searched, which is where `pHYs` must appear.
fn png_resolution(bytes: &[u8]) -> Option<Resolution> {
    let mut rest = bytes.strip_prefix(&PNG_SIGNATURE)?;

    while rest.len() >= 8 {
        let len = u32::from_be_bytes(rest[0..4].try_into().ok()?) as usize;
        let kind = &rest[4..8];
        let data = rest.get(8..8usize.checked_add(len)?)?;

        match kind {
            b"pHYs" if len == 9 => {
                let x = u32::from_be_bytes(data[0..4].try_into().ok()?);
                let y = u32::from_be_bytes(data[4..8].try_into().ok()?);
                if data[8] != 1 || x == 0 || y == 0 {
                    return None;
                }
                return Some(Resolution {
                    horizontal: x as f32 * INCHES_PER_METRE,
                    vertical: y as f32 * INCHES_PER_METRE,
                });
            }
            b"IDAT" | b"IEND" => return None,
            _ => {}
        }

        // Length, type, data, CRC.
        rest = rest.get(12 + len..)?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba};
    use tempfile::TempDir;

    #[test]
    fn empty_when_any_dimension_is_zero() {
        assert!(Raster::new(RgbaImage::new(0, 10)).is_empty());
        assert!(Raster::new(RgbaImage::new(10, 0)).is_empty());
        assert!(!Raster::new(RgbaImage::new(1, 1)).is_empty());
    }

    #[test]
    fn default_resolution_is_96_dpi() {
        let raster = Raster::new(RgbaImage::new(4, 4));
        assert_eq!(raster.resolution(), Resolution { horizontal: 96.0, vertical: 96.0 });
    }

    #[test]
    fn with_resolution_overrides_dpi() {
        let dpi = Resolution { horizontal: 300.0, vertical: 150.0 };
        let raster = Raster::new(RgbaImage::new(4, 4)).with_resolution(dpi);
        assert_eq!(raster.resolution(), dpi);
    }

    #[test]
    fn rgb_input_becomes_opaque_rgba() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        let raster = Raster::from(DynamicImage::ImageRgb8(rgb));
        assert_eq!(raster.pixels().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn open_decodes_png_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("source.png");
        RgbaImage::from_pixel(5, 7, Rgba([1, 2, 3, 4]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let raster = Raster::open(&path).unwrap();
        assert_eq!((raster.width(), raster.height()), (5, 7));
        assert_eq!(raster.pixels().get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }

    fn crc32(bytes: &[u8]) -> u32 {
        let mut crc = 0xFFFF_FFFFu32;
        for &byte in bytes {
            crc ^= u32::from(byte);
            for _ in 0..8 {
                crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
            }
        }
        !crc
    }

    /// PNG bytes with a `pHYs` chunk placed right after IHDR.
    fn png_with_phys(x: u32, y: u32, unit: u8) -> Vec<u8> {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])))
            .write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let mut body = b"pHYs".to_vec();
        body.extend_from_slice(&x.to_be_bytes());
        body.extend_from_slice(&y.to_be_bytes());
        body.push(unit);

        let mut chunk = 9u32.to_be_bytes().to_vec();
        chunk.extend_from_slice(&body);
        chunk.extend_from_slice(&crc32(&body).to_be_bytes());

        // Signature (8) + IHDR chunk (4 + 4 + 13 + 4).
        let tail = png.split_off(33);
        png.extend(chunk);
        png.extend(tail);
        png
    }

    #[test]
    fn open_reads_png_density() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("print.png");
        fs::write(&path, png_with_phys(11_811, 5_906, 1)).unwrap();

        let raster = Raster::open(&path).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 4));
        let dpi = raster.resolution();
        assert!((dpi.horizontal - 300.0).abs() < 0.01, "{dpi:?}");
        assert!((dpi.vertical - 150.0).abs() < 0.02, "{dpi:?}");
    }

    #[test]
    fn unitless_density_falls_back_to_default() {
        assert_eq!(png_resolution(&png_with_phys(2, 1, 0)), None);
        assert_eq!(png_resolution(&png_with_phys(0, 0, 1)), None);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("aspect.png");
        fs::write(&path, png_with_phys(2, 1, 0)).unwrap();
        assert_eq!(Raster::open(&path).unwrap().resolution(), Resolution::default());
    }

    #[test]
    fn non_png_input_gets_default_resolution() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        RgbImage::from_pixel(8, 8, Rgb([200, 100, 50]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        let raster = Raster::open(&path).unwrap();
        assert_eq!(raster.resolution(), Resolution::default());
        assert_eq!(png_resolution(b"not an image"), None);
    }

    #[test]
    fn png_without_density_gets_default_resolution() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.png");
        RgbaImage::new(2, 2).save_with_format(&path, ImageFormat::Png).unwrap();
        assert_eq!(Raster::open(&path).unwrap().resolution(), Resolution::default());
    }

    #[test]
    fn open_missing_file_fails() {
        assert!(Raster::open(Path::new("/nonexistent/source.png")).is_err());
    }
}
