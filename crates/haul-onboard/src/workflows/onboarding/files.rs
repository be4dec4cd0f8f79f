use std::collections::BTreeMap;

use super::domain::{FileHandle, FileSlot};

/// Holds at most one file per named slot. Replacing or clearing a slot drops the old handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSlots {
    entries: BTreeMap<FileSlot, FileHandle>,
}

impl FileSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `file` in `slot`, returning whatever was there before.
    pub fn pick(&mut self, slot: FileSlot, file: FileHandle) -> Option<FileHandle> {
        self.entries.insert(slot, file)
    }

    pub fn clear(&mut self, slot: FileSlot) -> Option<FileHandle> {
        self.entries.remove(&slot)
    }

    pub fn get(&self, slot: FileSlot) -> Option<&FileHandle> {
        self.entries.get(&slot)
    }

    pub fn is_filled(&self, slot: FileSlot) -> bool {
        self.entries.contains_key(&slot)
    }

    pub fn filled_count(&self) -> usize {
        self.entries.len()
    }

    /// Filled slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (FileSlot, &FileHandle)> {
        self.entries.iter().map(|(slot, file)| (*slot, file))
    }
}
