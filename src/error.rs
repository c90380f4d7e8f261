//! Error types.

use std::io;
use std::path::PathBuf;

use crate::ico::LayoutError;
use crate::resample::ResampleError;
use crate::sizes::SizeListError;

/// Broad failure category, for callers that present distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad source image or size list.
    InvalidInput,
    /// The interpolation step could not produce the requested size.
    ResampleFailure,
    /// A payload could not be encoded or embedded.
    CompressionFailure,
    /// Writing the destination failed.
    IoFailure,
}

/// Icon encoding error.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// The size list failed validation.
    #[error("invalid size list: {0}")]
    InvalidSizeList(#[source] SizeListError),

    /// The source image has no pixels.
    #[error("source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },

    /// Resizing to one of the sizes failed.
    #[error("resample to {size}px: {source}")]
    ResampleFailure {
        size: u32,
        #[source]
        source: ResampleError,
    },

    /// PNG encoding of one of the sizes failed.
    #[error("compress {size}px payload: {source}")]
    CompressionFailure {
        size: u32,
        #[source]
        source: image::ImageError,
    },

    /// The payloads cannot be laid out in a container.
    #[error("assemble container: {0}")]
    Layout(#[source] LayoutError),

    /// Writing or publishing the output failed.
    #[error("write {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSizeList(_) | Self::EmptySource { .. } => ErrorKind::InvalidInput,
            Self::Layout(LayoutError::NoImages | LayoutError::TooManyImages { .. }) => ErrorKind::InvalidInput,
            Self::ResampleFailure { .. } => ErrorKind::ResampleFailure,
            Self::CompressionFailure { .. } | Self::Layout(LayoutError::PayloadOverflow { .. }) => {
                ErrorKind::CompressionFailure
            }
            Self::IoFailure { .. } => ErrorKind::IoFailure,
        }
    }
}

impl From<SizeListError> for EncodeError {
    fn from(err: SizeListError) -> Self {
        Self::InvalidSizeList(err)
    }
}

impl From<LayoutError> for EncodeError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(EncodeError::from(SizeListError::Empty).kind(), ErrorKind::InvalidInput);
        assert_eq!(EncodeError::EmptySource { width: 0, height: 3 }.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            EncodeError::ResampleFailure {
                size: 16,
                source: ResampleError::InvalidTarget { width: 0, height: 0 },
            }
            .kind(),
            ErrorKind::ResampleFailure
        );
        assert_eq!(
            EncodeError::from(LayoutError::PayloadOverflow { size: 16 }).kind(),
            ErrorKind::CompressionFailure
        );
        assert_eq!(
            EncodeError::IoFailure { path: "a.ico".into(), source: io::Error::other("full") }.kind(),
            ErrorKind::IoFailure
        );
    }

    #[test]
    fn messages_name_the_size() {
        let err = EncodeError::ResampleFailure {
            size: 48,
            source: ResampleError::InvalidTarget { width: 0, height: 48 },
        };
        assert_eq!(err.to_string(), "resample to 48px: invalid target size 0x48");
    }
}
