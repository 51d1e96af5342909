/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::ArtifactSelector;

/// Input type for deleting uploaded import artifacts
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct DeleteArtifactsInput {
    /// Which artifact set(s) to remove.
    pub selector: Option<ArtifactSelector>,

    /// Delete even when a selected conversion task is still active.
    pub ignore_active_task: bool,
}

impl DeleteArtifactsInput {
    /// Which artifact set(s) to remove.
    pub fn selector(&self) -> Option<&ArtifactSelector> {
        self.selector.as_ref()
    }

    /// Delete even when a selected conversion task is still active.
    pub fn ignore_active_task(&self) -> bool {
        self.ignore_active_task
    }
}

/// A builder for [DeleteArtifactsInput]
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct DeleteArtifactsInputBuilder {
    pub(crate) selector: Option<ArtifactSelector>,
    pub(crate) ignore_active_task: bool,
}

impl DeleteArtifactsInputBuilder {
    /// Which artifact set(s) to remove. Required.
    pub fn selector(mut self, input: ArtifactSelector) -> Self {
        self.selector = Some(input);
        self
    }

    /// Delete even when a selected conversion task is still active.
    pub fn ignore_active_task(mut self, input: bool) -> Self {
        self.ignore_active_task = input;
        self
    }

    /// Consumes the builder and constructs a [`DeleteArtifactsInput`]
    pub fn build(
        self,
    ) -> Result<DeleteArtifactsInput, ::aws_smithy_types::error::operation::BuildError> {
        let selector = self.selector.ok_or(
            ::aws_smithy_types::error::operation::BuildError::missing_field(
                "selector",
                "an artifact selector is required",
            ),
        )?;

        Ok(DeleteArtifactsInput {
            selector: Some(selector),
            ignore_active_task: self.ignore_active_task,
        })
    }
}
