use icon_forge::encoder::IconEncoder;
use icon_forge::error::{EncodeError, ErrorKind};
use icon_forge::ico::{ENTRY_LEN, HEADER_LEN, read_icon};
use icon_forge::presets::SizePreset;
use icon_forge::raster::Raster;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn red_square(size: u32) -> Raster {
    Raster::new(RgbaImage::from_pixel(size, size, Rgba([255, 0, 0, 255])))
}

/// Soft round badge on a transparent background.
fn badge(size: u32) -> Raster {
    let c = size as f32 / 2.0;
    Raster::new(RgbaImage::from_fn(size, size, |x, y| {
        let d = ((x as f32 + 0.5 - c).powi(2) + (y as f32 + 0.5 - c).powi(2)).sqrt();
        if d < c * 0.8 {
            Rgba([30, 144, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    }))
}

#[test]
fn red_square_three_sizes() {
    let bytes = IconEncoder::new()
        .encode(&red_square(1024), &[256, 128, 64])
        .unwrap()
        .to_bytes();

    assert_eq!(&bytes[..6], &[0x00, 0x00, 0x01, 0x00, 0x03, 0x00]);
    assert_eq!(&bytes[6..8], &[0x00, 0x00]);
    assert_eq!(&bytes[22..24], &[0x80, 0x80]);
    assert_eq!(&bytes[38..40], &[0x40, 0x40]);

    let icon = read_icon(&bytes).unwrap();
    assert_eq!(icon.entries.len(), 3);

    let third = image::load_from_memory(icon.payload(2).unwrap()).unwrap().into_rgba8();
    assert_eq!(third.dimensions(), (64, 64));
    assert!(third.pixels().all(|p| p.0 == [255, 0, 0, 255]));
}

#[test]
fn directory_tiles_the_file() {
    let sizes = SizePreset::Max512.sizes();
    let bytes = IconEncoder::new().encode(&badge(600), sizes).unwrap().to_bytes();
    let icon = read_icon(&bytes).unwrap();

    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]) as usize, sizes.len());
    assert_eq!(icon.entries.len(), sizes.len());
    assert_eq!(icon.entries[0].offset as usize, HEADER_LEN + ENTRY_LEN * sizes.len());
    for pair in icon.entries.windows(2) {
        assert_eq!(pair[0].end(), u64::from(pair[1].offset));
    }
    assert_eq!(icon.entries.last().unwrap().end(), bytes.len() as u64);
}

#[test]
fn every_entry_matches_its_size() {
    let sizes = SizePreset::Max512.sizes();
    let container = IconEncoder::new().parallel(true).encode(&badge(200), sizes).unwrap();
    let bytes = container.to_bytes();
    let icon = read_icon(&bytes).unwrap();

    for (i, &size) in sizes.iter().enumerate() {
        let entry = &icon.entries[i];
        let expected = if size >= 256 { 0 } else { size as u8 };
        assert_eq!((entry.width, entry.height), (expected, expected), "size {size}");
        assert_eq!(entry.color_count, 0);
        assert_eq!(entry.reserved, 0);
        assert_eq!(entry.color_planes, 0);
        assert_eq!(entry.bits_per_pixel, 32);

        let decoded = image::load_from_memory(icon.payload(i).unwrap()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (size, size));
    }
}

#[test]
fn same_input_same_bytes() {
    let source = badge(333);
    let sizes = SizePreset::Max256.sizes();
    let first = IconEncoder::new().encode(&source, sizes).unwrap().to_bytes();
    let second = IconEncoder::new().encode(&source, sizes).unwrap().to_bytes();
    assert_eq!(first, second);
}

#[test]
fn invalid_inputs() {
    let source = red_square(32);

    let err = IconEncoder::new().encode(&source, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = IconEncoder::new().encode(&source, &[64, 0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = "64,-1".parse::<icon_forge::sizes::SizeList>().unwrap_err();
    assert_eq!(EncodeError::from(err).kind(), ErrorKind::InvalidInput);

    let empty = Raster::new(RgbaImage::new(0, 32));
    let err = IconEncoder::new().encode(&empty, &[16]).unwrap_err();
    assert!(matches!(err, EncodeError::EmptySource { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn file_output_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("badge.ico");

    IconEncoder::new()
        .encode_to_file(&badge(128), &[48, 32, 16], &path)
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let icon = read_icon(&bytes).unwrap();
    let sizes: Vec<u32> = icon.entries.iter().map(|e| e.pixel_width()).collect();
    assert_eq!(sizes, vec![48, 32, 16]);
}
