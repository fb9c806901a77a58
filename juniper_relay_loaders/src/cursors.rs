use crate::cursor_errors::CursorError;
use base64::prelude::*;
use std::fmt::{Display, Formatter};

const CURSOR_SEGMENT_DELIMITER: &str = "||";
const OFFSET_CURSOR_PREFIX: &str = "offset";

/// Cursor struct that builds into an opaque string.
/// Cursors are present both in the edges and in the PageInfo within the Connection.
///
/// The only built-in implementation is `OffsetCursor`, which is what the connection windower
/// mints and reads back. Implement this trait if you need a differently shaped cursor, e.g. for
/// keyset pagination.
pub trait Cursor {
    /// Concrete type of the returned cursor. Usually the thing that implements the trait.
    type CursorType;

    /// Serialize the cursor into a string ready to be base64 encoded.
    fn to_raw_string(&self) -> String;

    /// Constructor that given the raw string, and a vector of parts (the delimited segments)
    /// will return a Result of the CursorType. Return a CursorError if the decoding fails.
    fn from_parts(raw: &str, parts: Vec<&str>) -> Result<Self::CursorType, CursorError>;

    /// Builds the CursorType from a base64 encoded string.
    /// Returns a CursorError if the decoding fails.
    fn from_encoded_string(input: &str) -> Result<Self::CursorType, CursorError> {
        let decoded = BASE64_URL_SAFE.decode(input)?;
        let decoded_string = String::from_utf8(decoded)?;
        Self::from_parts(
            decoded_string.as_str(),
            decoded_string.split(CURSOR_SEGMENT_DELIMITER).collect(),
        )
    }

    /// Builds the base64 encoded variant of the cursor.
    /// Uses the url safe alphabet.
    fn to_encoded_string(&self) -> String {
        BASE64_URL_SAFE.encode(self.to_raw_string().as_bytes())
    }
}

/// Decodes a cursor from a base64 encoded string into the correct concrete instance type.
/// Use the Turbofish `::<>()` syntax to tell the method what that correct type is.
///
/// ```rust
/// use juniper_relay_loaders::{cursor_from_encoded_string, OffsetCursor};
///
/// let decoded_cursor = cursor_from_encoded_string::<OffsetCursor>("b2Zmc2V0fHwx");
/// assert_eq!(decoded_cursor.unwrap().offset, 1);
/// ```
pub fn cursor_from_encoded_string<T>(input: &str) -> Result<T, CursorError>
where
    T: Cursor<CursorType = T>,
{
    let cursor = T::from_encoded_string(input)?;
    Ok(cursor)
}

/// Encodes a row position into the opaque cursor handed out on edges and in `PageInfo`.
pub fn encode_cursor(position: usize) -> String {
    OffsetCursor::new(position).to_encoded_string()
}

/// Reads a row position back out of a cursor produced by `encode_cursor`.
///
/// The position is only meaningful under the ordering the cursor was minted with; the caller has
/// to re-apply that ordering before using it.
pub fn decode_cursor(cursor: &str) -> Result<usize, CursorError> {
    Ok(cursor_from_encoded_string::<OffsetCursor>(cursor)?.offset)
}

/// Position of a row within one ordering of a result set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetCursor {
    /// Zero based index of the row.
    pub offset: usize,
}

impl OffsetCursor {
    pub fn new(offset: usize) -> Self {
        OffsetCursor { offset }
    }
}

impl Cursor for OffsetCursor {
    type CursorType = OffsetCursor;

    fn to_raw_string(&self) -> String {
        format!(
            "{}{}{}",
            OFFSET_CURSOR_PREFIX, CURSOR_SEGMENT_DELIMITER, self.offset
        )
    }

    fn from_parts(_raw: &str, parts: Vec<&str>) -> Result<OffsetCursor, CursorError> {
        let [prefix, offset] = parts.as_slice() else {
            return Err(CursorError::InvalidCursor);
        };
        if *prefix != OFFSET_CURSOR_PREFIX {
            return Err(CursorError::InvalidCursor);
        }

        let offset = offset
            .parse::<i128>()
            .map_err(|_| CursorError::InvalidCursor)?;
        if offset < 0 {
            return Err(CursorError::NegativeOffset(offset));
        }

        let offset = usize::try_from(offset).map_err(|_| CursorError::InvalidCursor)?;
        Ok(OffsetCursor { offset })
    }
}

impl Display for OffsetCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_raw_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::cursor_errors::CursorError;
    use crate::{Cursor, OffsetCursor, decode_cursor, encode_cursor};
    use base64::prelude::*;

    #[test]
    fn test_offset_cursor_default() {
        let cursor = OffsetCursor::default();
        assert_eq!(cursor.offset, 0);
    }

    #[test]
    fn test_offset_cursor_raw_string() {
        let cursor = OffsetCursor { offset: 1 };
        assert_eq!(cursor.to_string(), "offset||1");
    }

    #[test]
    fn test_offset_cursor_encoded_string() {
        let cursor = OffsetCursor { offset: 1 };
        assert_eq!(cursor.to_encoded_string(), "b2Zmc2V0fHwx");
    }

    #[test]
    fn test_offset_cursor_from_encoded_string() {
        let cursor = OffsetCursor::from_encoded_string("b2Zmc2V0fHwx").unwrap();
        assert_eq!(cursor.offset, 1);
    }

    #[test]
    fn test_positions_survive_encoding() {
        for position in [0, 1, 9, 10, 99, 12_345, usize::MAX] {
            assert_eq!(decode_cursor(&encode_cursor(position)).unwrap(), position);
        }
    }

    #[test]
    fn test_distinct_positions_give_distinct_cursors() {
        assert_ne!(encode_cursor(10), encode_cursor(100));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        assert!(matches!(
            decode_cursor("not base64!"),
            Err(CursorError::Base64(_))
        ));
    }

    #[test]
    fn test_rejects_non_utf8_payload() {
        let cursor = BASE64_URL_SAFE.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode_cursor(&cursor), Err(CursorError::Utf8(_))));
    }

    #[test]
    fn test_rejects_foreign_payloads() {
        for raw in ["offset", "string||abc", "offset||1||10", "offset||ten", ""] {
            let cursor = BASE64_URL_SAFE.encode(raw);
            assert_eq!(decode_cursor(&cursor), Err(CursorError::InvalidCursor), "{raw}");
        }
    }

    #[test]
    fn test_rejects_negative_offsets() {
        let cursor = BASE64_URL_SAFE.encode("offset||-3");
        assert_eq!(decode_cursor(&cursor), Err(CursorError::NegativeOffset(-3)));
    }
}
