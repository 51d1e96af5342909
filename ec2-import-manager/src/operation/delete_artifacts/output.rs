/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Output type for a completed artifact deletion.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct DeleteArtifactsOutput {
    pub(crate) objects_deleted: u64,
    pub(crate) key_spaces_removed: Vec<String>,
}

impl DeleteArtifactsOutput {
    /// Number of S3 objects removed.
    ///
    /// Zero when the artifacts were already gone; deletion is idempotent.
    pub fn objects_deleted(&self) -> u64 {
        self.objects_deleted
    }

    /// The key spaces (as `s3://bucket/prefix` strings) the selector resolved to.
    pub fn key_spaces_removed(&self) -> &[String] {
        &self.key_spaces_removed
    }
}
