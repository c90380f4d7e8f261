use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;

use crate::error::EncodeError;
use crate::ico::{EncodedPayload, IconContainer};
use crate::output::write_atomic;
use crate::raster::Raster;
use crate::resample::Resampler;
use crate::sizes::SizeList;

/// Builds multi-resolution ICO files from a single source image.
///
/// Every size is resampled from the original (never from a smaller
/// intermediate), encoded as a PNG payload and laid out in the order the
/// sizes were given.
///
/// # Example
///
/// ```rust
/// use icon_forge::encoder::IconEncoder;
/// use icon_forge::raster::Raster;
/// use image::{Rgba, RgbaImage};
///
/// let source = Raster::new(RgbaImage::from_pixel(512, 512, Rgba([255, 0, 0, 255])));
/// let container = IconEncoder::new().encode(&source, &[256, 48, 16]).unwrap();
///
/// let bytes = container.to_bytes();
/// assert_eq!(&bytes[..6], &[0, 0, 1, 0, 3, 0]);
/// assert_eq!(container.entries()[0].width, 0); // 256 is stored as 0
/// assert_eq!(container.entries()[1].width, 48);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IconEncoder {
    parallel: bool,
    overwrite: bool,
}

impl Default for IconEncoder {
    fn default() -> Self {
        Self {
            parallel: false,
            overwrite: true,
        }
    }
}

impl IconEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether [`encode_to_file`](Self::encode_to_file) may replace an
    /// existing file (default `true`). When `false`, an existing target is
    /// left alone and the call fails with an
    /// [`IoFailure`](crate::error::ErrorKind::IoFailure).
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Resample and compress sizes on worker threads.
    ///
    /// Output is byte-identical to the sequential path.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Encode `source` at each of `sizes`.
    ///
    /// Fails with an [`InvalidInput`](crate::error::ErrorKind::InvalidInput)
    /// error before any resampling if the source is empty or the size list is
    /// empty, contains a non-positive, oversized or repeated size.
    pub fn encode(&self, source: &Raster, sizes: &[u32]) -> Result<IconContainer, EncodeError> {
        if source.is_empty() {
            return Err(EncodeError::EmptySource {
                width: source.width(),
                height: source.height(),
            });
        }
        let sizes = SizeList::try_from(sizes)?;

        log::debug!(
            "Encoding {}x{} source at {} sizes: {sizes}",
            source.width(),
            source.height(),
            sizes.len()
        );

        let resampler = Resampler::new(source).map_err(|e| EncodeError::ResampleFailure {
            size: sizes.as_slice()[0],
            source: e,
        })?;

        let payloads = if self.parallel {
            encode_parallel(&resampler, sizes.as_slice())?
        } else {
            sizes
                .iter()
                .map(|size| encode_payload(&resampler, size))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(IconContainer::new(payloads)?)
    }

    /// Encode and publish to `path` in one step.
    ///
    /// The file is written to a temporary sibling and renamed into place, so
    /// on failure `path` is never left holding a truncated icon.
    pub fn encode_to_file(
        &self,
        source: &Raster,
        sizes: &[u32],
        path: &Path,
    ) -> Result<IconContainer, EncodeError> {
        let container = self.encode(source, sizes)?;

        write_atomic(path, self.overwrite, |out| container.write_to(out)).map_err(|e| {
            EncodeError::IoFailure {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        log::info!(
            "Wrote {} ({} images, {} bytes)",
            path.display(),
            container.entries().len(),
            container.len()
        );
        Ok(container)
    }
}

/// Resample to `size` x `size` and compress as PNG.
fn encode_payload(resampler: &Resampler<'_>, size: u32) -> Result<EncodedPayload, EncodeError> {
    let resized = resampler
        .resample(size, size)
        .map_err(|e| EncodeError::ResampleFailure { size, source: e })?;

    let data = encode_png(&resized).map_err(|e| EncodeError::CompressionFailure { size, source: e })?;
    log::debug!("  {size}px -> {} bytes", data.len());

    Ok(EncodedPayload { size, data })
}

/// Lossless RGBA8 PNG with fixed settings, so equal input gives equal bytes.
fn encode_png(raster: &Raster) -> Result<Vec<u8>, image::ImageError> {
    let mut data = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut data, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(
        raster.pixels().as_raw(),
        raster.width(),
        raster.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(data)
}

/// Map sizes to payloads in batches of the available parallelism, keeping
/// results at their original index.
fn encode_parallel(resampler: &Resampler<'_>, sizes: &[u32]) -> Result<Vec<EncodedPayload>, EncodeError> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let mut slots: Vec<Option<EncodedPayload>> = vec![None; sizes.len()];

    for (batch_index, batch) in sizes.chunks(workers).enumerate() {
        let results: Vec<Result<EncodedPayload, EncodeError>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|&size| scope.spawn(move || encode_payload(resampler, size)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        for (offset, result) in results.into_iter().enumerate() {
            slots[batch_index * workers + offset] = Some(result?);
        }
    }

    Ok(slots.into_iter().flatten().collect())
}
