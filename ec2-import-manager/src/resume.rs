/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{self, Error};

/// Hex characters kept from the digest when naming a memo file
const FINGERPRINT_HEX_CHARS: usize = 8;

/// Durable, local, best-effort record of where an interrupted upload left off.
///
/// Each memo is a single small file whose name is derived from the image path
/// and target bucket and whose content is the import manifest key. One memo
/// exists per (image, bucket) pair at most; concurrent jobs for distinct
/// images never collide. This is a local resumption aid, not a distributed
/// lock; nothing here coordinates across machines.
#[derive(Debug, Clone)]
pub struct ResumeMemoStore {
    dir: PathBuf,
}

impl ResumeMemoStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Deterministic memo file name for an (image path, bucket) pair.
    ///
    /// The image file name is suffixed with the first eight hex characters of
    /// a SHA-256 digest over the lowercased `path.bucket` string. Truncation
    /// is fine here: the namespace is one user's memo directory, not a
    /// security boundary.
    pub fn fingerprint(source_path: &Path, bucket: &str) -> String {
        let normalized = format!("{}.{}", source_path.display(), bucket).to_lowercase();
        let digest = Sha256::digest(normalized.as_bytes());

        let mut suffix = String::with_capacity(FINGERPRINT_HEX_CHARS);
        for byte in digest.iter().take(FINGERPRINT_HEX_CHARS / 2) {
            write!(&mut suffix, "{byte:02x}").expect("write to string");
        }

        let base_name = source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{base_name}.{suffix}")
    }

    fn memo_path(&self, source_path: &Path, bucket: &str) -> PathBuf {
        self.dir.join(Self::fingerprint(source_path, bucket))
    }

    /// Record `manifest_key` as the resume point for (image, bucket),
    /// overwriting any prior memo.
    ///
    /// Errors propagate: a memo that silently failed to persist would make a
    /// later resume impossible while the caller believes otherwise.
    pub fn write(&self, source_path: &Path, bucket: &str, manifest_key: &str) -> Result<(), Error> {
        std::fs::create_dir_all(&self.dir)?;
        let memo_path = self.memo_path(source_path, bucket);
        std::fs::write(&memo_path, manifest_key.as_bytes())?;
        tracing::debug!("wrote resume memo {:?}", memo_path);
        Ok(())
    }

    /// Look up the manifest key recorded for (image, bucket).
    ///
    /// Returns `Ok(None)` when no memo exists. Any other I/O failure means
    /// the memo is present but unusable and resume cannot proceed.
    pub fn read(&self, source_path: &Path, bucket: &str) -> Result<Option<String>, Error> {
        let memo_path = self.memo_path(source_path, bucket);
        match std::fs::read_to_string(&memo_path) {
            Ok(contents) => {
                let manifest_key = contents.trim().to_owned();
                if manifest_key.is_empty() {
                    return Err(error::resume_state_unavailable(format!(
                        "resume memo {:?} is empty",
                        memo_path
                    )));
                }
                Ok(Some(manifest_key))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(error::resume_state_unavailable(err)),
        }
    }

    /// Remove the memo for (image, bucket) if one exists.
    ///
    /// Best effort: a leftover memo is a harmless artifact that the next
    /// successful run overwrites, so failures are logged and swallowed.
    pub fn clear(&self, source_path: &Path, bucket: &str) {
        let memo_path = self.memo_path(source_path, bucket);
        match std::fs::remove_file(&memo_path) {
            Ok(()) => tracing::debug!("cleared resume memo {:?}", memo_path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::debug!("failed to clear resume memo {:?}: {}", memo_path, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResumeMemoStore;
    use crate::error::ErrorKind;
    use std::path::Path;

    #[test]
    fn test_fingerprint_is_deterministic() {
        let path = Path::new("/images/disk.vmdk");
        let first = ResumeMemoStore::fingerprint(path, "my-bucket");
        let second = ResumeMemoStore::fingerprint(path, "my-bucket");
        assert_eq!(first, second);
        assert!(first.starts_with("disk.vmdk."));
        let suffix = first.rsplit('.').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_varies_with_either_input() {
        let path = Path::new("/images/disk.vmdk");
        let base = ResumeMemoStore::fingerprint(path, "my-bucket");
        assert_ne!(
            base,
            ResumeMemoStore::fingerprint(path, "other-bucket"),
            "bucket must affect the fingerprint"
        );
        assert_ne!(
            base,
            ResumeMemoStore::fingerprint(Path::new("/images/other.vmdk"), "my-bucket"),
            "path must affect the fingerprint"
        );
    }

    #[test]
    fn test_fingerprint_is_case_insensitive() {
        assert_eq!(
            ResumeMemoStore::fingerprint(Path::new("/images/disk.vmdk"), "MY-BUCKET").rsplit('.').next().unwrap(),
            ResumeMemoStore::fingerprint(Path::new("/IMAGES/DISK.VMDK"), "my-bucket").rsplit('.').next().unwrap(),
        );
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path());
        let path = Path::new("/images/disk.vmdk");

        store.write(path, "my-bucket", "prefix/abc/manifest.xml").unwrap();
        let read_back = store.read(path, "my-bucket").unwrap();
        assert_eq!(read_back.as_deref(), Some("prefix/abc/manifest.xml"));
    }

    #[test]
    fn test_write_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path().join("nested").join("memos"));
        store
            .write(Path::new("disk.raw"), "b", "key/manifest.xml")
            .unwrap();
        assert_eq!(
            store.read(Path::new("disk.raw"), "b").unwrap().as_deref(),
            Some("key/manifest.xml")
        );
    }

    #[test]
    fn test_read_missing_memo_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path());
        assert!(store
            .read(Path::new("/images/disk.vmdk"), "my-bucket")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_read_missing_directory_is_none() {
        let store = ResumeMemoStore::new("/definitely/does/not/exist/anywhere");
        assert!(store
            .read(Path::new("/images/disk.vmdk"), "my-bucket")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_read_empty_memo_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path());
        let path = Path::new("/images/disk.vmdk");
        std::fs::write(
            dir.path().join(ResumeMemoStore::fingerprint(path, "my-bucket")),
            b"",
        )
        .unwrap();

        let err = store.read(path, "my-bucket").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ResumeStateUnavailable);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path());
        let path = Path::new("/images/disk.vmdk");

        // never written
        store.clear(path, "my-bucket");

        store.write(path, "my-bucket", "key/manifest.xml").unwrap();
        store.clear(path, "my-bucket");
        assert!(store.read(path, "my-bucket").unwrap().is_none());

        // already cleared
        store.clear(path, "my-bucket");
    }

    #[test]
    fn test_write_overwrites_prior_memo() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeMemoStore::new(dir.path());
        let path = Path::new("/images/disk.vmdk");

        store.write(path, "my-bucket", "first/manifest.xml").unwrap();
        store.write(path, "my-bucket", "second/manifest.xml").unwrap();
        assert_eq!(
            store.read(path, "my-bucket").unwrap().as_deref(),
            Some("second/manifest.xml")
        );
    }
}
