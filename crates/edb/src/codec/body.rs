//! `NativeBody` column dispatch. The first byte of the column names the
//! encoding; block-compressed and uncompressed bodies are handled here (the
//! latter two via the `compressed-body` crate), while the 7-bit transfer
//! encodings are classified and handed back to the caller untouched.

use super::{CodecError, CodecResult};

pub const BODY_HEADER_SIZE: usize = compressed_body::HEADER_SIZE;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum BodyEncoding {
    SevenBit = 0x10,
    SevenBitAlt = 0x12,
    SevenBitWide = 0x15,
    Uncompressed = 0x17,
    BlockCompressed = 0x18,
    BlockCompressedAlt = 0x19,
}

impl TryFrom<u8> for BodyEncoding {
    type Error = CodecError;

    fn try_from(value: u8) -> CodecResult<Self> {
        match value {
            0x10 => Ok(Self::SevenBit),
            0x12 => Ok(Self::SevenBitAlt),
            0x15 => Ok(Self::SevenBitWide),
            0x17 => Ok(Self::Uncompressed),
            0x18 => Ok(Self::BlockCompressed),
            0x19 => Ok(Self::BlockCompressedAlt),
            other => Err(CodecError::UnknownTypeMarker(other)),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NativeBody {
    /// Body bytes recovered in full.
    Decoded(Vec<u8>),
    /// A 7-bit transfer encoding this layer does not undo; the caller owns
    /// the MIME-level decode.
    Delegated(BodyEncoding),
}

pub fn decode_native_body(data: &[u8]) -> CodecResult<NativeBody> {
    let Some(&marker) = data.first() else {
        return Err(compressed_body::Error::TruncatedHeader(0).into());
    };

    match BodyEncoding::try_from(marker)? {
        encoding @ (BodyEncoding::SevenBit
        | BodyEncoding::SevenBitAlt
        | BodyEncoding::SevenBitWide) => Ok(NativeBody::Delegated(encoding)),
        BodyEncoding::Uncompressed => {
            if data.len() < BODY_HEADER_SIZE {
                return Err(compressed_body::Error::TruncatedHeader(data.len()).into());
            }
            Ok(NativeBody::Decoded(data[BODY_HEADER_SIZE..].to_vec()))
        }
        BodyEncoding::BlockCompressed | BodyEncoding::BlockCompressedAlt => {
            Ok(NativeBody::Decoded(compressed_body::decompress_body(data)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncompressed_passthrough() {
        let mut data = vec![0x17, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00];
        data.extend_from_slice(b"hello");
        let NativeBody::Decoded(body) = decode_native_body(&data).unwrap() else {
            panic!("0x17 bodies should decode");
        };
        assert_eq!(body, b"hello");
    }

    #[test]
    fn test_block_compressed_body() {
        let original = b"<html><body>status report status report</body></html>".to_vec();
        let data = compressed_body::compress_body(&original).unwrap();
        assert_eq!(data[0], 0x18);
        let NativeBody::Decoded(body) = decode_native_body(&data).unwrap() else {
            panic!("0x18 bodies should decode");
        };
        assert_eq!(body, original);
    }

    #[test]
    fn test_seven_bit_is_delegated() {
        for (marker, encoding) in [
            (0x10, BodyEncoding::SevenBit),
            (0x12, BodyEncoding::SevenBitAlt),
            (0x15, BodyEncoding::SevenBitWide),
        ] {
            let data = [marker, 0x00, 0x00];
            assert_eq!(
                decode_native_body(&data).unwrap(),
                NativeBody::Delegated(encoding)
            );
        }
    }

    #[test]
    fn test_unknown_marker() {
        let Err(CodecError::UnknownTypeMarker(marker)) = decode_native_body(&[0x42, 0x00]) else {
            panic!("unknown marker should fail");
        };
        assert_eq!(marker, 0x42);
    }

    #[test]
    fn test_empty_column() {
        let Err(CodecError::BodyCompression(compressed_body::Error::TruncatedHeader(0))) =
            decode_native_body(&[])
        else {
            panic!("empty column should fail");
        };
    }

    #[test]
    fn test_truncated_uncompressed_header() {
        let Err(CodecError::BodyCompression(compressed_body::Error::TruncatedHeader(len))) =
            decode_native_body(&[0x17, 0x00, 0x00])
        else {
            panic!("short header should fail");
        };
        assert_eq!(len, 3);
    }
}
