use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sizes::SizeList;

// Windows app icon sizes, largest first, per the Fluent iconography guide.
const SIZES_2048: &[u32] = &[2048, 1024, 512, 256, 128, 96, 80, 72, 64, 60, 48, 40, 36, 32, 30, 24, 20, 16];
const SIZES_1024: &[u32] = &[1024, 512, 256, 128, 96, 80, 72, 64, 60, 48, 40, 36, 32, 30, 24, 20, 16];
const SIZES_512: &[u32] = &[512, 256, 128, 96, 80, 72, 64, 60, 48, 40, 36, 32, 30, 24, 20, 16];
const SIZES_256: &[u32] = &[256, 128, 96, 80, 72, 64, 60, 48, 40, 36, 32, 30, 24, 20, 16];
const SIZES_128: &[u32] = &[128, 96, 80, 72, 64, 60, 48, 40, 36, 32, 30, 24, 20, 16];

/// A named, predefined size list keyed by its largest size.
///
/// # Example
///
/// ```rust
/// use icon_forge::presets::SizePreset;
///
/// let preset: SizePreset = "256".parse().unwrap();
/// assert_eq!(preset.sizes()[0], 256);
/// assert_eq!(*preset.sizes().last().unwrap(), 16);
/// assert_eq!(SizePreset::default(), SizePreset::Max1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SizePreset {
    #[serde(rename = "2048")]
    Max2048,
    #[default]
    #[serde(rename = "1024")]
    Max1024,
    #[serde(rename = "512")]
    Max512,
    #[serde(rename = "256")]
    Max256,
    #[serde(rename = "128")]
    Max128,
}

impl SizePreset {
    pub const ALL: [SizePreset; 5] = [
        Self::Max2048,
        Self::Max1024,
        Self::Max512,
        Self::Max256,
        Self::Max128,
    ];

    /// The preset's key, as accepted on the command line and in config files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Max2048 => "2048",
            Self::Max1024 => "1024",
            Self::Max512 => "512",
            Self::Max256 => "256",
            Self::Max128 => "128",
        }
    }

    /// Sizes in descending order, down to 16.
    pub fn sizes(&self) -> &'static [u32] {
        match self {
            Self::Max2048 => SIZES_2048,
            Self::Max1024 => SIZES_1024,
            Self::Max512 => SIZES_512,
            Self::Max256 => SIZES_256,
            Self::Max128 => SIZES_128,
        }
    }

    pub fn size_list(&self) -> SizeList {
        SizeList::try_from(self.sizes()).unwrap_or_else(|e| unreachable!("preset {self} is invalid: {e}"))
    }
}

impl fmt::Display for SizePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown preset key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown size preset \"{0}\" (expected one of 2048, 1024, 512, 256, 128)")]
pub struct UnknownPreset(pub String);

impl FromStr for SizePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.key() == s.trim())
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
