//! Repeat-pattern text codec used inside packed property blobs.
//!
//! A printable byte followed by a two-byte trigger (`00 00` or `48 48`)
//! expands to four copies of that byte. Everything else is literal or
//! skipped: spaces are always literal, control bytes are stepped over one at
//! a time, and high bytes (`>= 0x80`) are stepped over together with the
//! byte that follows them. Decoding is driven by a declared character count
//! carried just before the encoded bytes.

use std::ops::Range;

use super::{CodecError, CodecResult};

const REPEAT_FACTOR: usize = 4;

/// Decoded text together with the span of input bytes it was produced from,
/// so a caller scanning a larger blob knows where to resume.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecodedText {
    pub text: String,
    pub source: Range<usize>,
}

fn is_printable(b: u8) -> bool {
    (0x21..=0x7E).contains(&b)
}

/// Decodes until `declared_len` characters have been produced. The input may
/// extend past the decoded span; trailing bytes are left untouched.
pub fn decode_repeat_pattern(declared_len: u8, input: &[u8]) -> CodecResult<DecodedText> {
    let declared = declared_len as usize;
    let mut text = String::with_capacity(declared);
    let mut pos = 0;

    while text.len() < declared {
        let Some(&byte) = input.get(pos) else {
            return Err(CodecError::TruncatedInput {
                declared,
                produced: text.len(),
            });
        };

        if byte == b' ' {
            text.push(' ');
            pos += 1;
        } else if is_printable(byte) {
            let trigger = input.get(pos + 1..pos + 3);
            if matches!(trigger, Some([0x00, 0x00] | [0x48, 0x48])) {
                if text.len() + REPEAT_FACTOR > declared {
                    return Err(CodecError::LengthMismatch {
                        declared,
                        produced: text.len(),
                    });
                }
                for _ in 0..REPEAT_FACTOR {
                    text.push(byte as char);
                }
                pos += 3;
            } else {
                text.push(byte as char);
                pos += 1;
            }
        } else if byte >= 0x80 {
            // High bytes carry one trailing payload byte; skip both.
            pos = (pos + 2).min(input.len());
        } else {
            pos += 1;
        }
    }

    Ok(DecodedText {
        text,
        source: 0..pos,
    })
}

/// Produces the length prefix followed by the encoded bytes. Runs of four or
/// more identical characters are packed as repeat triggers; anything outside
/// the printable-or-space repertoire has no encoding.
pub fn encode_repeat_pattern(text: &str) -> CodecResult<Vec<u8>> {
    if let Some(bad) = text.chars().find(|&c| c != ' ' && !c.is_ascii_graphic()) {
        return Err(CodecError::UnencodableChar(bad));
    }
    if text.len() > u8::MAX as usize {
        return Err(CodecError::TextTooLong(text.len()));
    }

    let mut out = vec![text.len() as u8];
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let byte = bytes[pos];
        let mut run = 1;
        while pos + run < bytes.len() && bytes[pos + run] == byte {
            run += 1;
        }

        if byte != b' ' && run >= REPEAT_FACTOR {
            for _ in 0..run / REPEAT_FACTOR {
                out.extend_from_slice(&[byte, 0x00, 0x00]);
            }
            for _ in 0..run % REPEAT_FACTOR {
                push_literal(&mut out, byte);
            }
        } else {
            for _ in 0..run {
                push_literal(&mut out, byte);
            }
        }
        pos += run;
    }

    Ok(out)
}

/// `0x48` is both the letter `H` and a trigger byte, so a literal `H`
/// landing after `[printable, H]` would read back as a repeat trigger. A
/// filler control byte, which the decoder skips, breaks the pair.
fn push_literal(out: &mut Vec<u8>, byte: u8) {
    if byte == 0x48 {
        if let [.., before, prev] = out[..] {
            if prev == 0x48 && is_printable(before) {
                out.push(0x01);
            }
        }
    }
    out.push(byte);
}
