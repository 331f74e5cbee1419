#![doc = include_str!("../README.md")]

pub mod codec;

/// Storage location the engine materialized a column value from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ValueOrigin {
    /// Stored inline in the record.
    Inline,
    /// Resolved from out-of-line long-value storage.
    LongValue,
}

/// A column value handed over by the storage engine: a flat, fully
/// materialized byte buffer tagged with where it came from. Decoders borrow
/// it for the duration of one call and never retain it.
#[derive(Copy, Clone, Debug)]
pub struct RawBuffer<'a> {
    bytes: &'a [u8],
    origin: ValueOrigin,
}

impl<'a> RawBuffer<'a> {
    pub fn new(bytes: &'a [u8], origin: ValueOrigin) -> Self {
        Self { bytes, origin }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn origin(&self) -> ValueOrigin {
        self.origin
    }
}

impl AsRef<[u8]> for RawBuffer<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}
