/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::{Path, PathBuf};

use crate::types::{DiskImageFormat, FailedUploadPolicy, ProgressListener};

/// Input type for uploading a disk image
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct UploadImageInput {
    /// Path to the local disk image file.
    pub source: Option<PathBuf>,

    /// The S3 bucket name the manifest and parts will upload to.
    pub bucket: Option<String>,

    /// Optional key prefix the manifest key space is created under.
    pub key_prefix: Option<String>,

    /// The image format. Derived from the file extension when unset.
    pub format: Option<DiskImageFormat>,

    /// Size in GiB of the volume the image converts into. Derived from the
    /// image size when unset.
    pub volume_size_gib: Option<u64>,

    /// Number of concurrent part uploads (1-30).
    pub upload_concurrency: Option<usize>,

    /// Validity window in days for the signed URLs embedded in the manifest.
    pub url_expiration_days: Option<u64>,

    /// Continue a previously interrupted upload rather than starting fresh.
    pub resume: bool,

    /// The policy to apply when a part upload fails.
    pub failure_policy: FailedUploadPolicy,

    /// Listener notified of upload progress.
    pub progress_listener: Option<ProgressListener>,
}

impl UploadImageInput {
    /// Path to the local disk image file.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The S3 bucket name the manifest and parts will upload to.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Optional key prefix the manifest key space is created under.
    pub fn key_prefix(&self) -> Option<&str> {
        self.key_prefix.as_deref()
    }

    /// The image format. Derived from the file extension when unset.
    pub fn format(&self) -> Option<&DiskImageFormat> {
        self.format.as_ref()
    }

    /// Size in GiB of the volume the image converts into.
    pub fn volume_size_gib(&self) -> Option<u64> {
        self.volume_size_gib
    }

    /// Number of concurrent part uploads (1-30).
    pub fn upload_concurrency(&self) -> Option<usize> {
        self.upload_concurrency
    }

    /// Validity window in days for the signed URLs embedded in the manifest.
    pub fn url_expiration_days(&self) -> Option<u64> {
        self.url_expiration_days
    }

    /// Continue a previously interrupted upload rather than starting fresh.
    pub fn resume(&self) -> bool {
        self.resume
    }

    /// The policy to apply when a part upload fails.
    pub fn failure_policy(&self) -> &FailedUploadPolicy {
        &self.failure_policy
    }

    /// Listener notified of upload progress.
    pub fn progress_listener(&self) -> Option<&ProgressListener> {
        self.progress_listener.as_ref()
    }
}

/// A builder for [UploadImageInput]
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct UploadImageInputBuilder {
    pub(crate) source: Option<PathBuf>,
    pub(crate) bucket: Option<String>,
    pub(crate) key_prefix: Option<String>,
    pub(crate) format: Option<DiskImageFormat>,
    pub(crate) volume_size_gib: Option<u64>,
    pub(crate) upload_concurrency: Option<usize>,
    pub(crate) url_expiration_days: Option<u64>,
    pub(crate) resume: bool,
    pub(crate) failure_policy: FailedUploadPolicy,
    pub(crate) progress_listener: Option<ProgressListener>,
}

impl UploadImageInputBuilder {
    /// Path to the local disk image file. Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.source = Some(input.into());
        self
    }

    /// The S3 bucket name the manifest and parts will upload to. Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Optional key prefix the manifest key space is created under.
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.key_prefix = Some(input.into());
        self
    }

    /// Explicitly set the image format instead of deriving it from the file
    /// extension.
    pub fn format(mut self, input: DiskImageFormat) -> Self {
        self.format = Some(input);
        self
    }

    /// Size in GiB of the volume the image converts into.
    pub fn volume_size_gib(mut self, input: u64) -> Self {
        self.volume_size_gib = Some(input);
        self
    }

    /// Number of concurrent part uploads (1-30). Default is 10.
    pub fn upload_concurrency(mut self, input: usize) -> Self {
        self.upload_concurrency = Some(input);
        self
    }

    /// Validity window in days for the signed URLs embedded in the manifest.
    /// Default is 30 days; must be at least 1.
    pub fn url_expiration_days(mut self, input: u64) -> Self {
        self.url_expiration_days = Some(input);
        self
    }

    /// Continue a previously interrupted upload rather than starting fresh.
    pub fn resume(mut self, input: bool) -> Self {
        self.resume = input;
        self
    }

    /// The policy to apply when a part upload fails. Default rolls the upload back.
    pub fn failure_policy(mut self, input: FailedUploadPolicy) -> Self {
        self.failure_policy = input;
        self
    }

    /// Listener notified of upload progress at part and stage boundaries.
    pub fn progress_listener(mut self, input: impl Into<ProgressListener>) -> Self {
        self.progress_listener = Some(input.into());
        self
    }

    /// Consumes the builder and constructs an [`UploadImageInput`]
    pub fn build(
        self,
    ) -> Result<UploadImageInput, ::aws_smithy_types::error::operation::BuildError> {
        let source = self.source.ok_or(
            ::aws_smithy_types::error::operation::BuildError::missing_field(
                "source",
                "a local disk image path is required",
            ),
        )?;
        let bucket = self.bucket.ok_or(
            ::aws_smithy_types::error::operation::BuildError::missing_field(
                "bucket",
                "a target bucket is required",
            ),
        )?;

        Ok(UploadImageInput {
            source: Some(source),
            bucket: Some(bucket),
            key_prefix: self.key_prefix,
            format: self.format,
            volume_size_gib: self.volume_size_gib,
            upload_concurrency: self.upload_concurrency,
            url_expiration_days: self.url_expiration_days,
            resume: self.resume,
            failure_policy: self.failure_policy,
            progress_listener: self.progress_listener,
        })
    }
}
