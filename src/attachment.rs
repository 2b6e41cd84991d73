//! Attachment resolution - stored filename to read-only file handle
//!
//! Attachment filenames are path fragments resolved under a private root
//! directory supplied by the hosting environment. Resolution failures are
//! deliberately uniform: a caller cannot tell a missing row from a missing
//! file, both are simply "nothing to show".

use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Private directory attachment filenames resolve under.
#[derive(Debug, Clone)]
pub struct AttachmentRoot {
    root: PathBuf,
}

impl AttachmentRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Open a stored filename read-only. Every failure is `NotFound`; which
    /// step failed is not observable to the caller.
    pub fn open(&self, file_name: &str) -> Result<File> {
        let path = self.root.join(file_name);
        tracing::debug!("opening attachment {}", path.display());
        File::open(&path).map_err(|e| {
            tracing::warn!("failed opening {}: {}", path.display(), e);
            Error::NotFound
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_open_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("icon.png"), b"png-bytes").unwrap();

        let root = AttachmentRoot::new(dir.path());
        let mut file = root.open("icon.png").unwrap();
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"png-bytes");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let root = AttachmentRoot::new(dir.path());
        assert!(matches!(root.open("absent.png"), Err(Error::NotFound)));
    }
}
