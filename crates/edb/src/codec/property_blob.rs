//! Heuristic scanner for the packed property blob carried by message
//! records. The blob has no parseable framing; three fields are recovered by
//! pattern: the sender display name ends at an `M` marker byte, the byte
//! after the marker declares the repeat-pattern-encoded subject length, and
//! the message identifier is an RFC 5322 style `<local@domain>` token with
//! NUL bytes interleaved by the store.

use super::repeat_text::{self, DecodedText};
use super::{CodecError, CodecResult};

const FIELD_MARKER: u8 = 0x4D;
const MAX_NAME_SCAN: usize = 64;
const MAX_SUBJECT_SCAN: usize = 128;
const MAX_MESSAGE_ID_SCAN: usize = 100;
const MIN_NAME_LEN: usize = 2;

/// A recovered field and the blob offset it starts at.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PropertyField {
    pub value: String,
    pub offset: usize,
}

/// Fields recovered from one property blob. Each field is independent: a
/// blob with no recognizable sender can still yield a message identifier.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct PropertyBlob {
    pub sender: Option<PropertyField>,
    pub subject: Option<PropertyField>,
    pub message_id: Option<PropertyField>,
}

enum ScanState {
    Seeking,
    InField { start: usize, value: String },
}

fn is_name_byte(b: u8) -> bool {
    b == b' ' || (0x21..=0x7E).contains(&b)
}

/// Recovers sender, subject and message identifier from a property blob.
/// Absent fields are `None`; only a structurally impossible blob (a marker
/// as the very last byte) is an error.
pub fn scan_property_blob(blob: &[u8]) -> CodecResult<PropertyBlob> {
    let mut result = PropertyBlob::default();

    if let Some(marker) = find_marker(blob) {
        if let Some(sender) = extract_sender(blob, marker) {
            if marker + 1 >= blob.len() {
                return Err(CodecError::TruncatedField(marker));
            }
            result.sender = Some(sender);
            result.subject = extract_subject(blob, marker);
        }
    }
    result.message_id = extract_message_id(blob);

    Ok(result)
}

/// First marker byte that has a plausible name running up to it.
fn find_marker(blob: &[u8]) -> Option<usize> {
    blob.iter().enumerate().position(|(pos, &b)| {
        b == FIELD_MARKER && name_start(blob, pos).is_some()
    })
}

/// Backwards scan from the marker over name bytes, bounded to
/// `MAX_NAME_SCAN` and requiring at least `MIN_NAME_LEN` characters.
fn name_start(blob: &[u8], marker: usize) -> Option<usize> {
    let floor = marker.saturating_sub(MAX_NAME_SCAN);
    let mut start = marker;
    while start > floor && is_name_byte(blob[start - 1]) {
        start -= 1;
    }
    (marker - start >= MIN_NAME_LEN).then_some(start)
}

fn extract_sender(blob: &[u8], marker: usize) -> Option<PropertyField> {
    let start = name_start(blob, marker)?;
    let value = String::from_utf8_lossy(&blob[start..marker])
        .trim()
        .to_string();
    (value.len() >= MIN_NAME_LEN).then_some(PropertyField {
        value,
        offset: start,
    })
}

/// The byte after the marker declares the subject length; the encoded
/// subject follows it. A blob that defeats the repeat-pattern decoder gets a
/// literal fallback so a garbled trigger never costs the whole field.
fn extract_subject(blob: &[u8], marker: usize) -> Option<PropertyField> {
    let declared = *blob.get(marker + 1)?;
    if declared == 0 {
        return None;
    }
    let encoded = &blob[marker + 2..];
    match repeat_text::decode_repeat_pattern(declared, encoded) {
        Ok(DecodedText { text, .. }) => Some(PropertyField {
            value: text,
            offset: marker + 2,
        }),
        Err(err) => {
            tracing::trace!(offset = marker + 2, %err, "subject decode failed, falling back to literal scan");
            literal_subject(encoded, declared as usize).map(|value| PropertyField {
                value,
                offset: marker + 2,
            })
        }
    }
}

/// Fallback: collect printable characters from a bounded window, stopping at
/// the declared count.
fn literal_subject(encoded: &[u8], declared: usize) -> Option<String> {
    let window = &encoded[..encoded.len().min(MAX_SUBJECT_SCAN)];
    let value: String = window
        .iter()
        .filter(|b| is_name_byte(**b))
        .take(declared)
        .map(|&b| b as char)
        .collect();
    (!value.is_empty()).then_some(value)
}

/// State machine over the whole blob: `<` opens a candidate, NULs inside are
/// elided, `>` closes it if an `@` was seen. A candidate that runs past the
/// window or hits a non-identifier byte is abandoned and the scan resumes.
fn extract_message_id(blob: &[u8]) -> Option<PropertyField> {
    let mut state = ScanState::Seeking;

    for (pos, &byte) in blob.iter().enumerate() {
        state = match state {
            ScanState::Seeking => {
                if byte == b'<' {
                    ScanState::InField {
                        start: pos,
                        value: String::from("<"),
                    }
                } else {
                    ScanState::Seeking
                }
            }
            ScanState::InField { start, mut value } => {
                if byte == 0 {
                    ScanState::InField { start, value }
                } else if byte == b'>' {
                    value.push('>');
                    if value.contains('@') {
                        return Some(PropertyField {
                            value,
                            offset: start,
                        });
                    }
                    ScanState::Seeking
                } else if (0x21..=0x7E).contains(&byte) && pos - start < MAX_MESSAGE_ID_SCAN {
                    value.push(byte as char);
                    ScanState::InField { start, value }
                } else {
                    ScanState::Seeking
                }
            }
        };
    }
    None
}
