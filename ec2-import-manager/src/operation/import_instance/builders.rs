/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_ec2::types::{ArchitectureValues, InstanceType, PlatformValues, ShutdownBehavior};

use crate::error::Error;
use crate::types::DiskImageFormat;

use super::{ImportInstance, ImportInstanceInputBuilder, ImportInstanceOutput};

/// Fluent builder for constructing a conversion request
#[derive(Debug)]
pub struct ImportInstanceFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: ImportInstanceInputBuilder,
}

impl ImportInstanceFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>) -> Self {
        Self {
            handle,
            inner: ::std::default::Default::default(),
        }
    }

    /// The bucket holding the uploaded manifest and parts. Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// The key of the uploaded import manifest. Required.
    pub fn manifest_key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.manifest_key(input);
        self
    }

    /// The image format recorded in the manifest. Required.
    pub fn image_format(mut self, input: DiskImageFormat) -> Self {
        self.inner = self.inner.image_format(input);
        self
    }

    /// Size of the source image in bytes. Required.
    pub fn image_size_bytes(mut self, input: u64) -> Self {
        self.inner = self.inner.image_size_bytes(input);
        self
    }

    /// Size in GiB of the volume the image converts into. Required.
    pub fn volume_size_gib(mut self, input: u64) -> Self {
        self.inner = self.inner.volume_size_gib(input);
        self
    }

    /// Description attached to the conversion task.
    pub fn description(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.description(input);
        self
    }

    /// The platform of the imported instance. Required.
    pub fn platform(mut self, input: PlatformValues) -> Self {
        self.inner = self.inner.platform(input);
        self
    }

    /// The instance type to launch. Required.
    pub fn instance_type(mut self, input: InstanceType) -> Self {
        self.inner = self.inner.instance_type(input);
        self
    }

    /// The architecture of the imported instance.
    pub fn architecture(mut self, input: ArchitectureValues) -> Self {
        self.inner = self.inner.architecture(input);
        self
    }

    /// Availability zone to launch the instance in.
    pub fn availability_zone(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.availability_zone(input);
        self
    }

    /// Append a security group name applied to the instance.
    pub fn group_name(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.group_name(input);
        self
    }

    /// Whether detailed monitoring is enabled.
    pub fn monitoring(mut self, input: bool) -> Self {
        self.inner = self.inner.monitoring(input);
        self
    }

    /// The subnet to launch the instance in.
    pub fn subnet_id(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.subnet_id(input);
        self
    }

    /// Primary private IP address of the instance.
    pub fn private_ip_address(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.private_ip_address(input);
        self
    }

    /// Base64-encoded user data made available to the instance.
    pub fn user_data(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.user_data(input);
        self
    }

    /// Behavior when the instance shuts itself down.
    pub fn instance_initiated_shutdown_behavior(mut self, input: ShutdownBehavior) -> Self {
        self.inner = self.inner.instance_initiated_shutdown_behavior(input);
        self
    }

    /// Submit the conversion request
    pub async fn send(self) -> Result<ImportInstanceOutput, Error> {
        let input = self.inner.build()?;
        ImportInstance::orchestrate(self.handle, input).await
    }
}

impl crate::operation::import_instance::input::ImportInstanceInputBuilder {
    /// Submit a conversion request with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<ImportInstanceOutput, Error> {
        let mut fluent_builder = client.import_instance();
        fluent_builder.inner = self;
        fluent_builder.send().await
    }
}
