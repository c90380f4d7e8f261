use std::fmt;
use std::str::FromStr;

/// Largest accepted icon edge length.
///
/// The directory's width/height bytes can only describe up to 255 (0 means
/// "256 or more"); the real dimensions of larger entries come from the PNG
/// payload, so this is a practical rather than a format limit.
pub const MAX_SIZE: u32 = 65_535;

/// Why a size list was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeListError {
    #[error("size list is empty")]
    Empty,

    #[error("size #{index} is {value}; sizes must be positive")]
    NotPositive { index: usize, value: i64 },

    #[error("size #{index} is {value}; the maximum is {max}", max = MAX_SIZE)]
    TooLarge { index: usize, value: i64 },

    #[error("size {value} is listed more than once")]
    Duplicate { value: u32 },

    #[error("cannot parse size \"{text}\"")]
    Unparsable { text: String },
}

/// An ordered, validated list of square icon sizes.
///
/// Order is significant: directory entries are written in this order and
/// some consumers pick the first matching entry.
///
/// # Example
///
/// ```rust
/// use icon_forge::sizes::SizeList;
///
/// let sizes: SizeList = "256, 128,64".parse().unwrap();
/// assert_eq!(sizes.as_slice(), &[256, 128, 64]);
///
/// assert!("".parse::<SizeList>().is_err());
/// assert!("32,0".parse::<SizeList>().is_err());
/// assert!("32,-16".parse::<SizeList>().is_err());
/// assert!("32,32".parse::<SizeList>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeList(Vec<u32>);

impl SizeList {
    /// Validate a list of candidate sizes.
    ///
    /// Signed input lets callers pass through whatever they parsed so that
    /// zero and negative values are reported as such.
    pub fn new<I>(sizes: I) -> Result<Self, SizeListError>
    where
        I: IntoIterator,
        I::Item: Into<i64>,
    {
        let mut list = Vec::new();
        for (index, value) in sizes.into_iter().map(Into::into).enumerate() {
            if value <= 0 {
                return Err(SizeListError::NotPositive { index, value });
            }
            if value > i64::from(MAX_SIZE) {
                return Err(SizeListError::TooLarge { index, value });
            }
            let value = value as u32;
            if list.contains(&value) {
                return Err(SizeListError::Duplicate { value });
            }
            list.push(value);
        }

        if list.is_empty() {
            return Err(SizeListError::Empty);
        }

        // Distinct values in 1..=MAX_SIZE keep the count within the header's u16.
        Ok(Self(list))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for SizeList {
    type Err = SizeListError;

    /// Parse a comma- or whitespace-separated list, e.g. `"256,128 64"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>().map_err(|_| SizeListError::Unparsable {
                    text: part.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(values)
    }
}

impl TryFrom<&[u32]> for SizeList {
    type Error = SizeListError;

    fn try_from(sizes: &[u32]) -> Result<Self, Self::Error> {
        Self::new(sizes.iter().copied())
    }
}

impl fmt::Display for SizeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}
