/// A single immediate child of the scan root and the kinds of filesystem
/// objects the walker distinguishes.
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::fs::FileType;
use std::path::PathBuf;

/// What a filesystem object is, as seen *without* following symlinks.
///
/// Only `File` contributes bytes. `Directory` contributes the sum of its
/// descendants. `Symlink` and `Other` (sockets, FIFOs, devices) are leaves
/// worth zero bytes and are never descended into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    /// Classify a `FileType` obtained from `symlink_metadata` or a directory
    /// listing (neither follows links).
    pub fn from_file_type(ft: FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Directory
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One row of a [`ScanReport`](super::ScanReport).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// File or directory name only (NOT the full path).
    pub name: CompactString,

    /// Cumulative size in bytes. For directories this is the sum of every
    /// regular file in the subtree; for files it is the file's own length.
    pub size: u64,

    /// Either `File` or `Directory`; symlinks and special files are never
    /// reported as entries.
    pub kind: EntryKind,
}

impl Entry {
    pub fn directory(name: CompactString, size: u64) -> Self {
        Self {
            name,
            size,
            kind: EntryKind::Directory,
        }
    }

    pub fn file(name: CompactString, size: u64) -> Self {
        Self {
            name,
            size,
            kind: EntryKind::File,
        }
    }
}

/// A descendant that could not be read. It counted as zero bytes and the
/// walk carried on past it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadableEntry {
    pub path: PathBuf,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn classifies_files_and_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("f.bin");
        fs::write(&file, b"abc").unwrap();

        let dir_type = fs::symlink_metadata(tmp.path()).unwrap().file_type();
        let file_type = fs::symlink_metadata(&file).unwrap().file_type();

        assert_eq!(EntryKind::from_file_type(dir_type), EntryKind::Directory);
        assert_eq!(EntryKind::from_file_type(file_type), EntryKind::File);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_is_not_a_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = tmp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let kind = EntryKind::from_file_type(fs::symlink_metadata(&link).unwrap().file_type());
        assert_eq!(kind, EntryKind::Symlink);
    }

    #[test]
    fn kind_serialises_lowercase() {
        let json = serde_json::to_string(&Entry::directory("sub".into(), 25)).unwrap();
        assert_eq!(json, r#"{"name":"sub","size":25,"kind":"directory"}"#);
    }
}
