use crate::domain::errors::RangeError;

const UNIT_PREFIX: &str = "bytes=";

// Inclusive byte interval into a file, always within `0..file_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Parses a single-range `bytes=<start>-<end>?` header value against a
    /// file of `file_size` bytes. A missing end means "to the last byte".
    ///
    /// Suffix ranges (`bytes=-500`), multi-range lists and any stray
    /// characters are malformed. Ranges that run past the file, or any range
    /// on an empty file, are unsatisfiable rather than clamped.
    pub fn parse(header: &str, file_size: u64) -> Result<Self, RangeError> {
        let ranges = header
            .strip_prefix(UNIT_PREFIX)
            .ok_or(RangeError::Malformed)?;
        let (start, end) = ranges.split_once('-').ok_or(RangeError::Malformed)?;

        let start = parse_position(start)?;
        let end = if end.is_empty() {
            None
        } else {
            Some(parse_position(end)?)
        };

        let end = match end {
            Some(end) => end,
            None => file_size.checked_sub(1).ok_or(RangeError::Unsatisfiable)?,
        };

        if start > end || end >= file_size {
            return Err(RangeError::Unsatisfiable);
        }

        Ok(Self { start, end })
    }

    pub fn content_length(&self) -> u64 {
        self.end - self.start + 1
    }

    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, file_size)
    }
}

// Digits only: no sign, no whitespace, no list separators.
//
// A digit run too large for `u64` is past the end of any file.
fn parse_position(value: &str) -> Result<u64, RangeError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed);
    }
    value.parse().map_err(|_| RangeError::Unsatisfiable)
}
