use super::{DirectoryEntry, ENTRY_LEN, HEADER_LEN, ResourceType, payload_start};

/// Why a byte sequence is not a usable ICO file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("file is truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("reserved header field is {0:#06x}, expected 0")]
    Reserved(u16),

    #[error("unknown resource type {0}")]
    UnknownType(u16),

    #[error("file contains no images")]
    NoImages,

    #[error("payload of entry #{index} lies outside the file")]
    PayloadOutOfBounds { index: usize },
}

/// A parsed ICO file borrowing the underlying bytes.
#[derive(Debug, Clone)]
pub struct IconFile<'a> {
    pub kind: ResourceType,
    pub entries: Vec<DirectoryEntry>,
    bytes: &'a [u8],
}

impl<'a> IconFile<'a> {
    /// Raw payload bytes of entry `index` (a PNG or BMP stream).
    pub fn payload(&self, index: usize) -> Option<&'a [u8]> {
        let entry = self.entries.get(index)?;
        let start = entry.offset as usize;
        self.bytes.get(start..start + entry.byte_len as usize)
    }

    /// `true` if the payload of entry `index` starts with the PNG signature.
    pub fn is_png(&self, index: usize) -> bool {
        const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
        self.payload(index)
            .is_some_and(|data| data.starts_with(PNG_SIGNATURE))
    }
}

/// Parse and validate an ICO (or CUR) file.
///
/// Checks the header, that the directory fits in the file, and that every
/// payload lies inside the file. Payload contents are not decoded.
///
/// # Example
///
/// ```rust
/// use icon_forge::ico::{EncodedPayload, IconContainer, read_icon};
///
/// let bytes = IconContainer::new(vec![EncodedPayload { size: 16, data: vec![7; 4] }])
///     .unwrap()
///     .to_bytes();
/// let icon = read_icon(&bytes).unwrap();
/// assert_eq!(icon.entries.len(), 1);
/// assert_eq!(icon.payload(0), Some(&[7u8, 7, 7, 7][..]));
/// ```
pub fn read_icon(bytes: &[u8]) -> Result<IconFile<'_>, ReadError> {
    if bytes.len() < HEADER_LEN {
        return Err(ReadError::Truncated { needed: HEADER_LEN, actual: bytes.len() });
    }

    let reserved = u16::from_le_bytes([bytes[0], bytes[1]]);
    if reserved != 0 {
        return Err(ReadError::Reserved(reserved));
    }
    let type_number = u16::from_le_bytes([bytes[2], bytes[3]]);
    let kind = ResourceType::from_number(type_number).ok_or(ReadError::UnknownType(type_number))?;
    let count = usize::from(u16::from_le_bytes([bytes[4], bytes[5]]));
    if count == 0 {
        return Err(ReadError::NoImages);
    }

    let directory_end = payload_start(count);
    if bytes.len() < directory_end {
        return Err(ReadError::Truncated { needed: directory_end, actual: bytes.len() });
    }

    let entries: Vec<DirectoryEntry> = bytes[HEADER_LEN..directory_end]
        .chunks_exact(ENTRY_LEN)
        .map(|chunk| {
            let mut record = [0u8; ENTRY_LEN];
            record.copy_from_slice(chunk);
            DirectoryEntry::from_bytes(&record)
        })
        .collect();

    for (index, entry) in entries.iter().enumerate() {
        if (entry.offset as usize) < directory_end || entry.end() > bytes.len() as u64 {
            return Err(ReadError::PayloadOutOfBounds { index });
        }
    }

    log::debug!("Parsed {kind:?} file with {count} entries ({} bytes)", bytes.len());

    Ok(IconFile { kind, entries, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ico::{EncodedPayload, IconContainer};

    fn sample() -> Vec<u8> {
        IconContainer::new(vec![
            EncodedPayload { size: 256, data: b"\x89PNG\r\n\x1a\nabc".to_vec() },
            EncodedPayload { size: 32, data: vec![1, 2, 3] },
        ])
        .unwrap()
        .to_bytes()
    }

    #[test]
    fn reads_back_written_container() {
        let bytes = sample();
        let icon = read_icon(&bytes).unwrap();

        assert_eq!(icon.kind, ResourceType::Icon);
        assert_eq!(icon.entries.len(), 2);
        assert_eq!(icon.entries[0].pixel_width(), 256);
        assert_eq!(icon.entries[1].pixel_height(), 32);
        assert_eq!(icon.payload(1), Some(&[1u8, 2, 3][..]));
        assert_eq!(icon.payload(2), None);
        assert!(icon.is_png(0));
        assert!(!icon.is_png(1));
    }

    #[test]
    fn short_header_is_truncated() {
        assert_eq!(
            read_icon(&[0, 0, 1]).unwrap_err(),
            ReadError::Truncated { needed: 6, actual: 3 }
        );
    }

    #[test]
    fn short_directory_is_truncated() {
        let bytes = sample();
        assert_eq!(
            read_icon(&bytes[..20]).unwrap_err(),
            ReadError::Truncated { needed: 38, actual: 20 }
        );
    }

    #[test]
    fn nonzero_reserved_is_rejected() {
        let mut bytes = sample();
        bytes[1] = 1;
        assert_eq!(read_icon(&bytes).unwrap_err(), ReadError::Reserved(0x0100));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut bytes = sample();
        bytes[2] = 3;
        assert_eq!(read_icon(&bytes).unwrap_err(), ReadError::UnknownType(3));
    }

    #[test]
    fn cursor_type_is_accepted() {
        let mut bytes = sample();
        bytes[2] = 2;
        assert_eq!(read_icon(&bytes).unwrap().kind, ResourceType::Cursor);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(read_icon(&[0, 0, 1, 0, 0, 0]).unwrap_err(), ReadError::NoImages);
    }

    #[test]
    fn payload_past_end_is_rejected() {
        let bytes = sample();
        let cut = &bytes[..bytes.len() - 1];
        assert_eq!(
            read_icon(cut).unwrap_err(),
            ReadError::PayloadOutOfBounds { index: 1 }
        );
    }
}
