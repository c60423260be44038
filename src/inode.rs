//! File identity used to recognise hard links.
//!
//! On Unix the identity is the `(device, inode)` pair. Other platforms expose
//! no stable identity through `std`, so every path counts as a distinct file.

use std::fs::Metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeId {
    dev: u64,
    ino: u64,
}

impl InodeId {
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Hash used by the visited set.
    pub fn hash_value(&self) -> u64 {
        self.ino ^ self.dev.rotate_left(32)
    }
}
