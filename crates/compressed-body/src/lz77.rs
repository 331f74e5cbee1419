//! Plain (non-Huffman) LZ77 payload codec, as used by the block-compressed
//! body format. Bit layout follows
//! [MS-XCA](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-xca/a8b7cb0a-92a6-4187-a23b-5e14273b96f8):
//! 32-bit little-endian indicator words consumed most-significant-bit first,
//! 16-bit match tokens split 13/3 into back-distance and length, and an
//! escape chain for lengths the 3-bit field saturates on.

use crate::{Error, Result};

const MIN_MATCH: usize = 3;
/// Largest back-distance the 13-bit offset field can express.
const MAX_DISTANCE: usize = 8192;
/// The greedy compressor stops here so the length field never saturates;
/// the escape chain is decode-only and covered by golden fixtures.
const MAX_MATCH: usize = 9;

fn take<const N: usize>(payload: &[u8], pos: &mut usize) -> Option<[u8; N]> {
    let bytes = payload.get(*pos..*pos + N)?;
    *pos += N;
    bytes.try_into().ok()
}

/// Decompresses `payload` until exactly `size` bytes have been produced.
/// Trailing payload bytes are ignored; padding has been observed after the
/// declared size.
pub(crate) fn decompress(payload: &[u8], size: usize) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(size);
    let mut flags = 0_u32;
    let mut flag_count = 0_u8;
    let mut pos = 0_usize;
    // Two consecutive saturated length fields split one extra byte between
    // them; this holds the position of that shared byte.
    let mut half_byte: Option<usize> = None;

    let exhausted = |produced: usize| Error::SizeMismatch {
        declared: size,
        produced,
    };

    while output.len() < size {
        if flag_count == 0 {
            let word = take(payload, &mut pos).ok_or_else(|| exhausted(output.len()))?;
            flags = u32::from_le_bytes(word);
            flag_count = 32;
        }
        flag_count -= 1;

        if flags & (1 << flag_count) == 0 {
            let byte = *payload.get(pos).ok_or_else(|| exhausted(output.len()))?;
            pos += 1;
            output.push(byte);
            continue;
        }

        let token = take(payload, &mut pos).ok_or_else(|| exhausted(output.len()))?;
        let token = u32::from(u16::from_le_bytes(token));
        let mut length = token & 0x07;
        let distance = (token >> 3) as usize + 1;

        if length == 7 {
            length = match half_byte.take() {
                Some(index) => u32::from(payload[index] >> 4),
                None => {
                    let byte = *payload.get(pos).ok_or_else(|| exhausted(output.len()))?;
                    half_byte = Some(pos);
                    pos += 1;
                    u32::from(byte & 0x0F)
                }
            };
            if length == 15 {
                let byte = *payload.get(pos).ok_or_else(|| exhausted(output.len()))?;
                pos += 1;
                length = u32::from(byte);
                if length == 255 {
                    let word: [u8; 2] =
                        take(payload, &mut pos).ok_or_else(|| exhausted(output.len()))?;
                    length = u32::from(u16::from_le_bytes(word));
                    if length == 0 {
                        let word = take(payload, &mut pos).ok_or_else(|| exhausted(output.len()))?;
                        length = u32::from_le_bytes(word);
                    }
                    if length < 22 {
                        return Err(Error::InvalidMatchLength(length));
                    }
                    length -= 22;
                }
                length += 15;
            }
            length += 7;
        }
        length += 3;

        if distance > output.len() {
            return Err(Error::InvalidMatchDistance {
                distance,
                produced: output.len(),
            });
        }

        // Overlapping copy: distance < length is legal and implements run
        // expansion, so the copy must go byte by byte.
        for _ in 0..length {
            if output.len() == size {
                break;
            }
            let byte = output[output.len() - distance];
            output.push(byte);
        }
    }

    Ok(output)
}

/// Greedy longest-match compressor over a bounded look-back window. Valid
/// output, not byte-identical to the original producer.
pub(crate) fn compress(data: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len() / 2 + 8);
    let mut flags = 0_u32;
    let mut flag_count = 0_u8;
    let mut tokens: Vec<u8> = Vec::with_capacity(64);
    let mut pos = 0_usize;

    while pos < data.len() {
        let (distance, length) = longest_match(data, pos);
        flags <<= 1;
        if length >= MIN_MATCH {
            flags |= 1;
            let token = (((distance - 1) as u16) << 3) | ((length - MIN_MATCH) as u16);
            tokens.extend_from_slice(&token.to_le_bytes());
            pos += length;
        } else {
            tokens.push(data[pos]);
            pos += 1;
        }
        flag_count += 1;
        if flag_count == 32 {
            output.extend_from_slice(&flags.to_le_bytes());
            output.append(&mut tokens);
            flags = 0;
            flag_count = 0;
        }
    }

    if flag_count > 0 {
        // Pad the final indicator word with match bits; the size-driven
        // decompressor never consumes them.
        let pad = 32 - u32::from(flag_count);
        flags = (flags << pad) | ((1_u32 << pad) - 1);
        output.extend_from_slice(&flags.to_le_bytes());
        output.append(&mut tokens);
    }

    output
}

fn longest_match(data: &[u8], pos: usize) -> (usize, usize) {
    let limit = (data.len() - pos).min(MAX_MATCH);
    let mut best = (0_usize, 0_usize);
    if limit < MIN_MATCH {
        return best;
    }

    for start in pos.saturating_sub(MAX_DISTANCE)..pos {
        let mut length = 0;
        while length < limit && data[start + length] == data[pos + length] {
            length += 1;
        }
        if length > best.1 {
            best = (pos - start, length);
        }
    }

    best
}
