use std::io::{self, Write};

use super::{DirectoryEntry, HEADER_LEN, ResourceType, payload_start};

/// PNG bytes for one icon size, ready to be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Edge length the payload was rendered at.
    pub size: u32,
    /// A complete PNG stream.
    pub data: Vec<u8>,
}

impl EncodedPayload {
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// The container cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("an icon needs at least one image")]
    NoImages,

    #[error("{count} images do not fit the 16-bit image count")]
    TooManyImages { count: usize },

    /// Payload offsets and lengths are 32-bit.
    #[error("payload for size {size} ends past the 4 GiB limit of the format")]
    PayloadOverflow { size: u32 },
}

/// A fully laid out ICO file.
///
/// Entries and payloads keep the order they were given in. The directory is
/// computed once in [`IconContainer::new`]; the payload region starts right
/// after it and every payload follows the previous one with no padding.
///
/// # Example
///
/// ```rust
/// use icon_forge::ico::{EncodedPayload, IconContainer};
///
/// let container = IconContainer::new(vec![
///     EncodedPayload { size: 256, data: vec![1, 2, 3] },
///     EncodedPayload { size: 32, data: vec![4, 5] },
/// ]).unwrap();
///
/// let bytes = container.to_bytes();
/// assert_eq!(&bytes[..6], &[0, 0, 1, 0, 2, 0]);
/// assert_eq!(bytes.len(), 6 + 2 * 16 + 5);
/// assert_eq!(container.entries()[1].offset, 41);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconContainer {
    entries: Vec<DirectoryEntry>,
    payloads: Vec<EncodedPayload>,
}

impl IconContainer {
    pub fn new(payloads: Vec<EncodedPayload>) -> Result<Self, LayoutError> {
        if payloads.is_empty() {
            return Err(LayoutError::NoImages);
        }
        if u16::try_from(payloads.len()).is_err() {
            return Err(LayoutError::TooManyImages { count: payloads.len() });
        }

        let mut offset = payload_start(payloads.len()) as u64;
        let mut entries = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            let overflow = LayoutError::PayloadOverflow { size: payload.size };
            let byte_len = u32::try_from(payload.byte_len()).map_err(|_| overflow.clone())?;
            let start = u32::try_from(offset).map_err(|_| overflow.clone())?;
            offset += u64::from(byte_len);
            u32::try_from(offset).map_err(|_| overflow)?;

            entries.push(DirectoryEntry::for_png(payload.size, byte_len, start));
        }

        Ok(Self { entries, payloads })
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn payloads(&self) -> &[EncodedPayload] {
        &self.payloads
    }

    /// Total file length in bytes.
    pub fn len(&self) -> usize {
        payload_start(self.entries.len())
            + self.payloads.iter().map(EncodedPayload::byte_len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn header(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[2..4].copy_from_slice(&ResourceType::Icon.number().to_le_bytes());
        // Count fits: checked in `new`.
        out[4..6].copy_from_slice(&(self.entries.len() as u16).to_le_bytes());
        out
    }

    /// Stream header, directory, then payloads into `out`.
    ///
    /// On error `out` holds an unspecified prefix of the file and must be
    /// discarded. Use [`IconEncoder::encode_to_file`](crate::encoder::IconEncoder::encode_to_file)
    /// to publish a file atomically.
    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(&self.header())?;
        for entry in &self.entries {
            out.write_all(&entry.to_bytes())?;
        }
        for payload in &self.payloads {
            out.write_all(&payload.data)?;
        }
        out.flush()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.header());
        for entry in &self.entries {
            out.extend_from_slice(&entry.to_bytes());
        }
        for payload in &self.payloads {
            out.extend_from_slice(&payload.data);
        }
        out
    }
}
