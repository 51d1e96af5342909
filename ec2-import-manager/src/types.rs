/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use core::fmt;
use std::path::Path;
use std::sync::Arc;

/// The on-disk format of a disk image to import.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiskImageFormat {
    /// VMware virtual disk
    Vmdk,

    /// Raw disk image
    Raw,

    /// Virtual Hard Disk (Hyper-V / Virtual PC)
    Vhd,

    /// A format outside the supported set.
    ///
    /// Derived from an unrecognized file extension. The import proceeds with
    /// a warning rather than failing; the conversion service performs its own
    /// validation.
    Other(String),
}

impl DiskImageFormat {
    /// Derive the image format from the extension of `path`.
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "vmdk" => DiskImageFormat::Vmdk,
            "raw" | "img" => DiskImageFormat::Raw,
            "vhd" => DiskImageFormat::Vhd,
            _ => DiskImageFormat::Other(ext.to_uppercase()),
        }
    }

    /// Whether this format is one the conversion service is known to accept.
    pub fn is_supported(&self) -> bool {
        !matches!(self, DiskImageFormat::Other(_))
    }

    /// The wire name of the format (e.g. `VMDK`)
    pub fn as_str(&self) -> &str {
        match self {
            DiskImageFormat::Vmdk => "VMDK",
            DiskImageFormat::Raw => "RAW",
            DiskImageFormat::Vhd => "VHD",
            DiskImageFormat::Other(other) => other.as_str(),
        }
    }
}

impl fmt::Display for DiskImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Policy for how to handle an image upload that fails partway through.
///
/// Default is to roll the upload back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FailedUploadPolicy {
    /// Delete the manifest and any uploaded parts on failure
    #[default]
    Rollback,
    /// Retain uploaded artifacts and record a resume memo. A later invocation
    /// with resume enabled continues from where this one left off.
    Retain,
}

/// A coarse-grained progress notification emitted while an upload runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub(crate) message: String,
    pub(crate) percent_complete: Option<u8>,
}

impl ProgressUpdate {
    pub(crate) fn new(message: impl Into<String>, percent_complete: Option<u8>) -> Self {
        Self {
            message: message.into(),
            percent_complete,
        }
    }

    /// Human readable description of the stage the upload is in
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Percent of the overall upload completed, when known
    pub fn percent_complete(&self) -> Option<u8> {
        self.percent_complete
    }
}

/// A callback invoked with [`ProgressUpdate`]s at part and stage boundaries.
///
/// The callback is invoked from upload worker tasks and must not block
/// materially or it will stall part uploads.
#[derive(Clone)]
pub struct ProgressListener {
    pub(crate) callback: Arc<dyn Fn(ProgressUpdate) + Send + Sync + 'static>,
}

impl ProgressListener {
    pub(crate) fn notify(&self, update: ProgressUpdate) {
        (self.callback)(update)
    }
}

impl fmt::Debug for ProgressListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("ProgressListener");
        formatter.field("callback", &"<closure>");
        formatter.finish()
    }
}

impl<F> From<F> for ProgressListener
where
    F: Fn(ProgressUpdate) + Send + Sync + 'static,
{
    fn from(value: F) -> Self {
        ProgressListener {
            callback: Arc::new(value),
        }
    }
}

/// Identifies the set of uploaded artifacts (manifest plus parts) to remove.
///
/// The three variants are equivalent ways of naming the same underlying
/// artifact set; each is resolved to `(bucket, manifest key)` pairs at the
/// operation boundary.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum ArtifactSelector {
    /// Conversion task IDs; each task is resolved to its manifest location
    ConversionTasks(Vec<String>),

    /// Presigned (or plain) S3 URLs of manifest objects
    ManifestUrls(Vec<String>),

    /// Manifest object keys within a single bucket
    ManifestKeys {
        /// The bucket holding the manifests
        bucket: String,
        /// The manifest object keys
        keys: Vec<String>,
    },
}
