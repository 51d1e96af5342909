/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::error::Error;
use crate::types::ArtifactSelector;

use super::{DeleteArtifacts, DeleteArtifactsInputBuilder, DeleteArtifactsOutput};

/// Fluent builder for constructing an artifact deletion
#[derive(Debug)]
pub struct DeleteArtifactsFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: DeleteArtifactsInputBuilder,
}

impl DeleteArtifactsFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// Which artifact set(s) to remove. Required.
    pub fn selector(mut self, input: ArtifactSelector) -> Self {
        self.inner = self.inner.selector(input);
        self
    }

    /// Delete even when a selected conversion task is still active.
    pub fn ignore_active_task(mut self, input: bool) -> Self {
        self.inner = self.inner.ignore_active_task(input);
        self
    }

    /// Resolve the selector and delete the artifacts
    pub async fn send(self) -> Result<DeleteArtifactsOutput, Error> {
        let input = self.inner.build()?;
        DeleteArtifacts::orchestrate(self.handle, input).await
    }
}

impl crate::operation::delete_artifacts::input::DeleteArtifactsInputBuilder {
    /// Delete uploaded artifacts with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<DeleteArtifactsOutput, Error> {
        let mut fluent_builder = client.delete_artifacts();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
