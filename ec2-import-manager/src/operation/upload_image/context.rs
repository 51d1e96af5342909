/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::manifest::ImportManifest;
use crate::operation::ImportContext;
use crate::operation::upload_image::UploadImageInput;
use crate::types::ProgressUpdate;

/// Upload operation specific state
#[derive(Debug)]
pub(crate) struct UploadImageState {
    pub(crate) input: UploadImageInput,
    pub(crate) bucket: String,
    pub(crate) source: PathBuf,
    pub(crate) manifest: ImportManifest,
    pub(crate) concurrency: usize,
    pub(crate) total_parts: u64,
    /// Parts known to be in the bucket, including any found already present
    /// when resuming. Drives the progress percentage.
    pub(crate) completed_parts: AtomicU64,
}

pub(crate) type UploadImageContext = ImportContext<UploadImageState>;

impl UploadImageContext {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, state: UploadImageState) -> Self {
        Self {
            handle,
            state: Arc::new(state),
        }
    }

    /// Record one more completed part and notify the progress listener.
    pub(crate) fn part_completed(&self, part_index: u64) {
        let done = self.state.completed_parts.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.state.total_parts;
        let percent = (done * 100 / total.max(1)).min(100) as u8;
        self.notify(
            format!("uploaded part {part_index} ({done} of {total})"),
            Some(percent),
        );
    }

    pub(crate) fn notify(&self, message: impl Into<String>, percent_complete: Option<u8>) {
        if let Some(listener) = self.state.input.progress_listener() {
            listener.notify(ProgressUpdate::new(message, percent_complete));
        }
    }
}
