/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_ec2::types::ConversionTask;

/// Output type for a submitted conversion request.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ImportInstanceOutput {
    pub(crate) conversion_task: Option<ConversionTask>,
}

impl ImportInstanceOutput {
    /// The conversion task EC2 assigned to this import.
    ///
    /// The task's lifecycle is owned by EC2; poll it via
    /// [`Client::describe_conversion_tasks`](crate::Client::describe_conversion_tasks).
    pub fn conversion_task(&self) -> Option<&ConversionTask> {
        self.conversion_task.as_ref()
    }

    /// The ID of the assigned conversion task, when present.
    pub fn conversion_task_id(&self) -> Option<&str> {
        self.conversion_task
            .as_ref()
            .and_then(|task| task.conversion_task_id())
    }
}
