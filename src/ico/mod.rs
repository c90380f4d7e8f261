//! ICO container layout: header, directory entries, reading and writing.
//!
//! An ICO file is a 6-byte header followed by one 16-byte directory entry per
//! image and then the image payloads. All integers are little-endian.
//!
//! | Offset    | Size | Field                           |
//! |-----------|------|---------------------------------|
//! | 0         | 2    | reserved (0)                    |
//! | 2         | 2    | type (1 = icon, 2 = cursor)     |
//! | 4         | 2    | image count                     |
//! | 6 + 16i   | 1    | width (0 means 256 or more)     |
//! | 7 + 16i   | 1    | height (0 means 256 or more)    |
//! | 8 + 16i   | 1    | palette colour count (0)        |
//! | 9 + 16i   | 1    | reserved (0)                    |
//! | 10 + 16i  | 2    | colour planes                   |
//! | 12 + 16i  | 2    | bits per pixel                  |
//! | 14 + 16i  | 4    | payload length                  |
//! | 18 + 16i  | 4    | payload offset from file start  |
//!
//! - [`IconContainer`] builds the byte layout from PNG payloads.
//! - [`read_icon`] parses and validates an existing file.

mod reader;
mod writer;

pub use reader::{IconFile, ReadError, read_icon};
pub use writer::{EncodedPayload, IconContainer, LayoutError};

/// Length of the file header.
pub const HEADER_LEN: usize = 6;

/// Length of one directory entry.
pub const ENTRY_LEN: usize = 16;

/// Bits per pixel recorded for every entry we write (RGBA8 PNG).
pub const BITS_PER_PIXEL: u16 = 32;

/// The header's type field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    Icon,
    /// Only accepted when reading; the encoder always writes icons.
    Cursor,
}

impl ResourceType {
    pub fn number(self) -> u16 {
        match self {
            Self::Icon => 1,
            Self::Cursor => 2,
        }
    }

    pub fn from_number(number: u16) -> Option<Self> {
        match number {
            1 => Some(Self::Icon),
            2 => Some(Self::Cursor),
            _ => None,
        }
    }
}

/// Value stored in an entry's one-byte width/height field.
///
/// Sizes of 256 and above do not fit; by convention they are stored as 0
/// and readers take the real dimensions from the payload. Every entry goes
/// through this function.
pub fn dimension_byte(size: u32) -> u8 {
    u8::try_from(size).unwrap_or(0)
}

/// Byte offset of the first payload for a container with `count` entries.
pub fn payload_start(count: usize) -> usize {
    HEADER_LEN + ENTRY_LEN * count
}

/// One 16-byte directory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub width: u8,
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub byte_len: u32,
    pub offset: u32,
}

impl DirectoryEntry {
    /// Entry for a square PNG payload of `size` pixels.
    pub fn for_png(size: u32, byte_len: u32, offset: u32) -> Self {
        Self {
            width: dimension_byte(size),
            height: dimension_byte(size),
            color_count: 0,
            reserved: 0,
            color_planes: 0,
            bits_per_pixel: BITS_PER_PIXEL,
            byte_len,
            offset,
        }
    }

    /// Width as a reader interprets it (0 is 256).
    pub fn pixel_width(&self) -> u32 {
        widen(self.width)
    }

    /// Height as a reader interprets it (0 is 256).
    pub fn pixel_height(&self) -> u32 {
        widen(self.height)
    }

    /// Offset of the first byte after this entry's payload.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.byte_len)
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_LEN] {
        let mut out = [0u8; ENTRY_LEN];
        out[0] = self.width;
        out[1] = self.height;
        out[2] = self.color_count;
        out[3] = self.reserved;
        out[4..6].copy_from_slice(&self.color_planes.to_le_bytes());
        out[6..8].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[8..12].copy_from_slice(&self.byte_len.to_le_bytes());
        out[12..16].copy_from_slice(&self.offset.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; ENTRY_LEN]) -> Self {
        Self {
            width: bytes[0],
            height: bytes[1],
            color_count: bytes[2],
            reserved: bytes[3],
            color_planes: u16::from_le_bytes([bytes[4], bytes[5]]),
            bits_per_pixel: u16::from_le_bytes([bytes[6], bytes[7]]),
            byte_len: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            offset: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }
}

fn widen(field: u8) -> u32 {
    if field == 0 { 256 } else { u32::from(field) }
}
