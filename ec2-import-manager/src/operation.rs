/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

/// Types for the disk image upload operation
pub mod upload_image;

/// Types for the import instance (conversion request) operation
pub mod import_instance;

/// Types for the uploaded artifact deletion operation
pub mod delete_artifacts;

/// Container for maintaining context required to carry out a single operation.
///
/// `State` is whatever additional operation specific state is required for the operation.
#[derive(Debug)]
pub(crate) struct ImportContext<State> {
    pub(crate) handle: Arc<crate::client::Handle>,
    pub(crate) state: Arc<State>,
}

impl<State> ImportContext<State> {
    /// The S3 client to use for SDK operations
    pub(crate) fn s3_client(&self) -> &aws_sdk_s3::Client {
        self.handle.config.s3_client()
    }
}

impl<State> Clone for ImportContext<State> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            state: self.state.clone(),
        }
    }
}

/// List every object under `prefix` as `(key, size)` pairs.
pub(crate) async fn list_key_space(
    s3_client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<(String, i64)>, crate::error::Error> {
    let mut objects = Vec::new();
    let mut pages = s3_client
        .list_objects_v2()
        .bucket(bucket)
        .prefix(prefix)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page = page?;
        for object in page.contents() {
            if let Some(key) = object.key() {
                objects.push((key.to_owned(), object.size().unwrap_or_default()));
            }
        }
    }

    Ok(objects)
}
