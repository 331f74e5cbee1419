//! ## Record codecs
//!
//! Byte-level decoders for the opaque column encodings of Exchange EDB
//! message tables. Each decoder is a pure function over a caller-owned
//! buffer; failures are typed, local, and recoverable per field.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0:?}")]
    IoError(#[from] io::Error),
    #[error("Invalid field length: {0} bytes")]
    InvalidLength(usize),
    #[error("Input exhausted after {produced} of {declared} characters")]
    TruncatedInput { declared: usize, produced: usize },
    #[error("Declared length {declared} overshot at {produced} characters")]
    LengthMismatch { declared: usize, produced: usize },
    #[error("Field marker at offset {0} has no following bytes")]
    TruncatedField(usize),
    #[error("Dangling entry marker at offset {0}")]
    TruncatedEntry(usize),
    #[error("Unrecognized linkage layout: 0x{0:02X}")]
    UnrecognizedLayout(u8),
    #[error("Unknown NativeBody type marker: 0x{0:02X}")]
    UnknownTypeMarker(u8),
    #[error("Character cannot be repeat-pattern encoded: {0:?}")]
    UnencodableChar(char),
    #[error("Text too long for a length-prefixed field: {0} characters")]
    TextTooLong(usize),
    #[error("Timestamp out of range: 0x{0:016X} ticks")]
    TimestampOutOfRange(u64),
    #[error("Body decompression error: {0}")]
    BodyCompression(#[from] compressed_body::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;

pub mod body;
pub mod filetime;
pub mod folder_id;
pub mod property_blob;
pub mod repeat_text;
pub mod subobjects;
