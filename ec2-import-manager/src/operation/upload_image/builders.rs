/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Error;
use crate::types::{DiskImageFormat, FailedUploadPolicy, ProgressListener};

use super::{UploadImage, UploadImageInputBuilder, UploadImageOutput};

/// Fluent builder for constructing a disk image upload
#[derive(Debug)]
pub struct UploadImageFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: UploadImageInputBuilder,
}

impl UploadImageFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Path to the local disk image file. Required.
    pub fn source(mut self, input: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.source(input);
        self
    }

    /// The S3 bucket name the manifest and parts will upload to. Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Optional key prefix the manifest key space is created under.
    pub fn key_prefix(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key_prefix(input);
        self
    }

    /// Explicitly set the image format instead of deriving it from the file
    /// extension.
    pub fn format(mut self, input: DiskImageFormat) -> Self {
        self.inner = self.inner.format(input);
        self
    }

    /// Size in GiB of the volume the image converts into. Derived from the
    /// image size when unset.
    pub fn volume_size_gib(mut self, input: u64) -> Self {
        self.inner = self.inner.volume_size_gib(input);
        self
    }

    /// Number of concurrent part uploads (1-30). Default is 10.
    pub fn upload_concurrency(mut self, input: usize) -> Self {
        self.inner = self.inner.upload_concurrency(input);
        self
    }

    /// Validity window in days for the signed URLs embedded in the manifest.
    /// Default is 30 days; must be at least 1.
    pub fn url_expiration_days(mut self, input: u64) -> Self {
        self.inner = self.inner.url_expiration_days(input);
        self
    }

    /// Continue a previously interrupted upload rather than starting fresh.
    pub fn resume(mut self, input: bool) -> Self {
        self.inner = self.inner.resume(input);
        self
    }

    /// The policy to apply when a part upload fails. Default rolls the upload
    /// back; retaining artifacts makes the job resumable instead.
    pub fn failure_policy(mut self, input: FailedUploadPolicy) -> Self {
        self.inner = self.inner.failure_policy(input);
        self
    }

    /// Listener notified of upload progress at part and stage boundaries.
    pub fn progress_listener(mut self, input: impl Into<ProgressListener>) -> Self {
        self.inner = self.inner.progress_listener(input);
        self
    }

    /// Upload the disk image and drive the job to completion
    pub async fn send(self) -> Result<UploadImageOutput, Error> {
        let input = self.inner.build()?;
        UploadImage::orchestrate(self.handle, input).await
    }
}

impl crate::operation::upload_image::input::UploadImageInputBuilder {
    /// Upload a disk image with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<UploadImageOutput, Error> {
        let mut fluent_builder = client.upload_image();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
