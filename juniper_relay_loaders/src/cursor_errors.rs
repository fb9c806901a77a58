use std::string::FromUtf8Error;
use thiserror::Error;

/// Reasons a cursor string could not be turned back into a position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CursorError {
    /// The cursor was not valid url-safe base64.
    #[error("cursor is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes were not UTF-8.
    #[error("cursor is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    /// The decoded payload did not have the expected shape.
    #[error("malformed cursor")]
    InvalidCursor,

    /// The payload decoded to an offset below zero.
    #[error("cursor offset {0} is negative")]
    NegativeOffset(i128),
}
