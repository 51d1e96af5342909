/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::DiskImageFormat;

/// Output type for a completed disk image upload.
///
/// Carries everything needed to start a conversion later via
/// [`ImportInstanceInput::from_upload`](crate::operation::import_instance::ImportInstanceInput::from_upload).
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct UploadImageOutput {
    pub(crate) bucket: String,
    pub(crate) manifest_key: String,
    pub(crate) image_format: DiskImageFormat,
    pub(crate) image_size_bytes: u64,
    pub(crate) volume_size_gib: u64,
    pub(crate) parts_total: u64,
    pub(crate) parts_uploaded: u64,
}

impl UploadImageOutput {
    /// The bucket the image was uploaded to
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key of the uploaded import manifest.
    ///
    /// This is the durable handle for the uploaded artifact set: it is what a
    /// conversion request references and what artifact cleanup selects by.
    pub fn manifest_key(&self) -> &str {
        &self.manifest_key
    }

    /// The image format recorded in the manifest
    pub fn image_format(&self) -> &DiskImageFormat {
        &self.image_format
    }

    /// Size of the source image in bytes
    pub fn image_size_bytes(&self) -> u64 {
        self.image_size_bytes
    }

    /// Size in GiB of the volume the image converts into
    pub fn volume_size_gib(&self) -> u64 {
        self.volume_size_gib
    }

    /// Total number of parts described by the manifest
    pub fn parts_total(&self) -> u64 {
        self.parts_total
    }

    /// Number of parts uploaded by this invocation.
    ///
    /// Less than [`parts_total`](Self::parts_total) when a resumed upload
    /// found parts already present in the bucket.
    pub fn parts_uploaded(&self) -> u64 {
        self.parts_uploaded
    }
}
