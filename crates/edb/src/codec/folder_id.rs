//! The 26-byte composite folder identifier stored in the folder table.
//! Layout: a 6-byte mailbox prefix, a big-endian inner prefix, the
//! big-endian folder number, big-endian type flags, and 8 reserved bytes.
//! Folder numbers below 28 are well-known system folders.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use super::{CodecError, CodecResult};

pub const FOLDER_ID_LEN: usize = 26;

/// Well-known system folders, keyed by folder number. Numbers at or above
/// 28 belong to user-created folders.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SpecialFolder {
    HiddenItems,
    Root,
    SpoolerQueue,
    Shortcuts,
    Finder,
    Views,
    CommonViews,
    Schedule,
    JunkEmail,
    IpmSubtree,
    Inbox,
    Outbox,
    SentItems,
    DeletedItems,
    Contacts,
    Calendar,
    Drafts,
    Journal,
    Notes,
    Tasks,
    RecoverableItems,
    Deletions,
    Versions,
    Purges,
    SyncIssues,
    Conflicts,
    LocalFailures,
    ServerFailures,
    Unclassified,
}

impl SpecialFolder {
    pub fn classify(folder_number: u32) -> Self {
        match folder_number {
            0 => Self::HiddenItems,
            1 => Self::Root,
            2 => Self::SpoolerQueue,
            3 => Self::Shortcuts,
            4 => Self::Finder,
            5 => Self::Views,
            6 => Self::CommonViews,
            7 => Self::Schedule,
            8 => Self::JunkEmail,
            9 => Self::IpmSubtree,
            10 => Self::Inbox,
            11 => Self::Outbox,
            12 => Self::SentItems,
            13 => Self::DeletedItems,
            14 => Self::Contacts,
            15 => Self::Calendar,
            16 => Self::Drafts,
            17 => Self::Journal,
            18 => Self::Notes,
            19 => Self::Tasks,
            20 => Self::RecoverableItems,
            21 => Self::Deletions,
            22 => Self::Versions,
            23 => Self::Purges,
            24 => Self::SyncIssues,
            25 => Self::Conflicts,
            26 => Self::LocalFailures,
            27 => Self::ServerFailures,
            _ => Self::Unclassified,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FolderIdentity {
    mailbox_prefix: [u8; 6],
    inner_prefix: u32,
    folder_number: u32,
    type_flags: u32,
    reserved: [u8; 8],
}

impl FolderIdentity {
    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        if data.len() != FOLDER_ID_LEN {
            return Err(CodecError::InvalidLength(data.len()));
        }
        let mut cursor = Cursor::new(data);

        let mut mailbox_prefix = [0; 6];
        cursor.read_exact(&mut mailbox_prefix)?;
        let inner_prefix = cursor.read_u32::<BigEndian>()?;
        let folder_number = cursor.read_u32::<BigEndian>()?;
        let type_flags = cursor.read_u32::<BigEndian>()?;
        let mut reserved = [0; 8];
        cursor.read_exact(&mut reserved)?;

        Ok(Self {
            mailbox_prefix,
            inner_prefix,
            folder_number,
            type_flags,
            reserved,
        })
    }

    /// Shared by every folder of the same mailbox; the cheapest way to group
    /// folders per mailbox without consulting the mailbox table.
    pub fn mailbox_prefix(&self) -> [u8; 6] {
        self.mailbox_prefix
    }

    pub fn inner_prefix(&self) -> u32 {
        self.inner_prefix
    }

    pub fn folder_number(&self) -> u32 {
        self.folder_number
    }

    pub fn type_flags(&self) -> u32 {
        self.type_flags
    }

    pub fn reserved(&self) -> [u8; 8] {
        self.reserved
    }

    pub fn special_folder(&self) -> SpecialFolder {
        SpecialFolder::classify(self.folder_number)
    }
}
