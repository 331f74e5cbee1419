//! Attachment-linkage ("subobjects") blob parser. The blob ties a message
//! record to the attachment table: a one-byte layout discriminator followed
//! by marker/index entry pairs. Two layouts are in the wild; they differ in
//! the entry marker byte and in whether the stored index carries a bias.

use super::{CodecError, CodecResult};

const DIRECT_ENTRY_MARKER: u8 = 0x21;
const BIASED_ENTRY_MARKER: u8 = 0x84;
const BIASED_KEY_OFFSET: u32 = 20;

/// Key into the attachment table.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct AttachmentKey(pub u32);

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum LinkageLayout {
    /// Entries are `0x21` followed by the raw attachment index.
    Direct = 0x01,
    /// Entries are `0x84` followed by an index stored 20 below its true
    /// value.
    Biased = 0x0F,
}

impl TryFrom<u8> for LinkageLayout {
    type Error = CodecError;

    fn try_from(value: u8) -> CodecResult<Self> {
        match value {
            0x01 => Ok(Self::Direct),
            0x0F => Ok(Self::Biased),
            other => Err(CodecError::UnrecognizedLayout(other)),
        }
    }
}

impl LinkageLayout {
    fn entry_marker(self) -> u8 {
        match self {
            Self::Direct => DIRECT_ENTRY_MARKER,
            Self::Biased => BIASED_ENTRY_MARKER,
        }
    }

    fn key(self, stored: u8) -> AttachmentKey {
        match self {
            Self::Direct => AttachmentKey(u32::from(stored)),
            Self::Biased => AttachmentKey(u32::from(stored) + BIASED_KEY_OFFSET),
        }
    }
}

/// Parsed linkage. A blob whose final entry marker has no index byte still
/// yields the keys recovered before it, with the defect recorded in
/// `truncated`.
#[derive(Default, Debug)]
pub struct AttachmentLinkage {
    pub keys: Vec<AttachmentKey>,
    pub truncated: Option<CodecError>,
}

pub fn parse_attachment_linkage(blob: &[u8]) -> CodecResult<AttachmentLinkage> {
    if blob.is_empty() {
        return Err(CodecError::InvalidLength(0));
    }
    let layout = LinkageLayout::try_from(blob[0])?;
    let marker = layout.entry_marker();

    let mut linkage = AttachmentLinkage::default();
    let mut pos = 1;

    while let Some(found) = blob[pos..].iter().position(|&b| b == marker) {
        let marker_pos = pos + found;
        match blob.get(marker_pos + 1) {
            Some(&stored) => {
                linkage.keys.push(layout.key(stored));
                pos = marker_pos + 2;
            }
            None => {
                tracing::debug!(offset = marker_pos, "entry marker with no index byte");
                linkage.truncated = Some(CodecError::TruncatedEntry(marker_pos));
                break;
            }
        }
    }

    Ok(linkage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_layout_keys() {
        let blob = [0x01, 0x00, 0x21, 0x03, 0xFF, 0x21, 0x07];
        let linkage = parse_attachment_linkage(&blob).unwrap();
        assert_eq!(linkage.keys, vec![AttachmentKey(3), AttachmentKey(7)]);
        assert!(linkage.truncated.is_none());
    }

    #[test]
    fn test_biased_layout_applies_offset() {
        let blob = [0x0F, 0x84, 0x03, 0x00, 0x84, 0x0A];
        let linkage = parse_attachment_linkage(&blob).unwrap();
        assert_eq!(linkage.keys, vec![AttachmentKey(23), AttachmentKey(30)]);
    }

    #[test]
    fn test_dangling_marker_keeps_earlier_keys() {
        let blob = [0x01, 0x21, 0x05, 0x21];
        let linkage = parse_attachment_linkage(&blob).unwrap();
        assert_eq!(linkage.keys, vec![AttachmentKey(5)]);
        let Some(CodecError::TruncatedEntry(offset)) = linkage.truncated else {
            panic!("dangling marker should be recorded");
        };
        assert_eq!(offset, 3);
    }

    #[test]
    fn test_unknown_layout() {
        let Err(CodecError::UnrecognizedLayout(lead)) = parse_attachment_linkage(&[0xFF, 0x21]) else {
            panic!("unknown lead byte should fail");
        };
        assert_eq!(lead, 0xFF);
    }

    #[test]
    fn test_empty_blob() {
        let Err(CodecError::InvalidLength(0)) = parse_attachment_linkage(&[]) else {
            panic!("empty blob should fail");
        };
    }

    #[test]
    fn test_no_entries() {
        let linkage = parse_attachment_linkage(&[0x0F, 0x00, 0x00]).unwrap();
        assert!(linkage.keys.is_empty());
        assert!(linkage.truncated.is_none());
    }
}
