//! # icon-forge
//!
//! Build multi-resolution Windows icon (`.ico`) files from a single image.
//! The source is resampled to every requested size with a bicubic filter,
//! each size is stored as a PNG payload, and the payloads are packed behind
//! the ICO header and directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use icon_forge::encoder::IconEncoder;
//! use icon_forge::presets::SizePreset;
//! use icon_forge::raster::Raster;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Decode any PNG, JPEG or WebP into an RGBA buffer
//!     let source = Raster::open(Path::new("logo.png"))?;
//!
//!     // 1024, 512, 256, ..., 20, 16
//!     let sizes = SizePreset::Max1024.sizes();
//!
//!     // Resample, compress and publish atomically
//!     let container = IconEncoder::new().encode_to_file(&source, sizes, Path::new("logo.ico"))?;
//!     println!("{} images, {} bytes", container.entries().len(), container.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## In Memory
//!
//! ```rust
//! use icon_forge::encoder::IconEncoder;
//! use icon_forge::ico::read_icon;
//! use icon_forge::raster::Raster;
//! use image::{Rgba, RgbaImage};
//!
//! let source = Raster::new(RgbaImage::from_pixel(300, 300, Rgba([0, 0, 255, 255])));
//! let bytes = IconEncoder::new().encode(&source, &[256, 32]).unwrap().to_bytes();
//!
//! let icon = read_icon(&bytes).unwrap();
//! assert_eq!(icon.entries[0].pixel_width(), 256);
//! assert_eq!(icon.entries[1].pixel_width(), 32);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — [`IconEncoder`](encoder::IconEncoder): size list in, ICO container out
//! - [`resample`] — bicubic, alpha-aware resizing
//! - [`ico`] — container layout, writer and reader
//! - [`sizes`] — validated size lists
//! - [`presets`] — standard Windows icon size sets
//! - [`raster`] — decoded source image with resolution metadata
//! - [`config`] — CLI configuration loading/saving
//! - [`error`] — error types

pub mod config;
pub mod encoder;
pub mod error;
pub mod ico;
pub mod output;
pub mod presets;
pub mod raster;
pub mod resample;
pub mod sizes;

pub use encoder::IconEncoder;
pub use error::{EncodeError, ErrorKind};
