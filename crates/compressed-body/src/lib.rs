#![doc = include_str!("../README.md")]

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Write};
use thiserror::Error;

mod lz77;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0:?}")]
    IoError(#[from] io::Error),
    #[error("Unknown compression type marker: 0x{0:02X}")]
    UnknownTypeMarker(u8),
    #[error("Truncated header: {0} bytes")]
    TruncatedHeader(usize),
    #[error("Compressed payload exhausted: produced {produced} of {declared} bytes")]
    SizeMismatch { declared: usize, produced: usize },
    #[error("Match distance {distance} exceeds {produced} decompressed bytes")]
    InvalidMatchDistance { distance: usize, produced: usize },
    #[error("Invalid extended match length: {0}")]
    InvalidMatchLength(u32),
    #[error("Uncompressed body too large: {0}")]
    UncompressedBodyTooLarge(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compression-type markers this codec handles. The 7-bit packed markers
/// (`0x10`, `0x12`, `0x15`) and the uncompressed marker (`0x17`) are the
/// storage-engine layer's concern.
pub const BLOCK_COMPRESSED: u8 = 0x18;
pub const BLOCK_COMPRESSED_ALT: u8 = 0x19;

/// Header length shared by every compression type: marker, size, reserved.
pub const HEADER_SIZE: usize = 7;

/// Decompresses a block-compressed body, header included: 1-byte type
/// marker, 16-bit little-endian uncompressed size, 4 reserved bytes,
/// LZ77 payload. Produces exactly the declared size; trailing payload
/// bytes beyond it are ignored.
pub fn decompress_body(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_SIZE {
        return Err(Error::TruncatedHeader(data.len()));
    }

    let mut cursor = Cursor::new(&data[..HEADER_SIZE]);
    let marker = cursor.read_u8()?;
    if marker != BLOCK_COMPRESSED && marker != BLOCK_COMPRESSED_ALT {
        return Err(Error::UnknownTypeMarker(marker));
    }

    let raw_size = cursor.read_u16::<LittleEndian>()?;
    let _reserved = cursor.read_u32::<LittleEndian>()?;

    lz77::decompress(&data[HEADER_SIZE..], raw_size as usize)
}

/// Compresses `data` into the block wire form. Round-trip support: the
/// stream is valid but need not match the original producer byte for byte.
pub fn compress_body(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > u16::MAX as usize {
        return Err(Error::UncompressedBodyTooLarge(data.len()));
    }

    let mut output = Cursor::new(Vec::with_capacity(data.len() / 2 + HEADER_SIZE));
    output.write_u8(BLOCK_COMPRESSED)?;
    output.write_u16::<LittleEndian>(data.len() as u16)?;
    output.write_u32::<LittleEndian>(0)?;
    output.write_all(&lz77::compress(data))?;

    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) {
        let compressed = compress_body(data).unwrap();
        assert_eq!(compressed[0], BLOCK_COMPRESSED);
        assert_eq!(
            u16::from_le_bytes([compressed[1], compressed[2]]) as usize,
            data.len()
        );
        assert_eq!(decompress_body(&compressed).unwrap(), data);
    }

    #[test]
    fn test_round_trip_empty() {
        round_trip(b"");
    }

    #[test]
    fn test_round_trip_single_byte() {
        round_trip(b"x");
    }

    #[test]
    fn test_round_trip_incompressible() {
        // 256 distinct byte values: no match anywhere, pure literals across
        // several indicator words.
        let data: Vec<u8> = (0..=255).collect();
        round_trip(&data);
    }

    #[test]
    fn test_round_trip_html_body() {
        let data = b"<html><body><p>Quarterly figures attached.</p></body></html>"
            .repeat(40);
        round_trip(&data);
    }

    #[test]
    fn test_trailing_payload_ignored() {
        let mut compressed = compress_body(b"hello world hello world").unwrap();
        compressed.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(decompress_body(&compressed).unwrap(), b"hello world hello world");
    }

    #[test]
    fn test_unknown_type_marker() {
        // 0x17 is the uncompressed passthrough handled upstream.
        let data = [0x17, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x68];
        let Err(Error::UnknownTypeMarker(marker)) = decompress_body(&data) else {
            panic!("marker should be rejected");
        };
        assert_eq!(marker, 0x17);
    }

    #[test]
    fn test_truncated_header() {
        let Err(Error::TruncatedHeader(len)) = decompress_body(&[0x18, 0x10, 0x00]) else {
            panic!("header should be truncated");
        };
        assert_eq!(len, 3);
    }

    #[test]
    fn test_declared_size_beyond_payload() {
        // Declares 64 bytes but carries a single literal.
        let data = [0x18, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x41];
        let Err(Error::SizeMismatch { declared, produced }) = decompress_body(&data) else {
            panic!("payload should be exhausted");
        };
        assert_eq!(declared, 64);
        assert_eq!(produced, 1);
    }

    #[test]
    fn test_compress_rejects_oversized_input() {
        let data = vec![0_u8; u16::MAX as usize + 1];
        let Err(Error::UncompressedBodyTooLarge(len)) = compress_body(&data) else {
            panic!("input should exceed the 16-bit size field");
        };
        assert_eq!(len, u16::MAX as usize + 1);
    }
}
