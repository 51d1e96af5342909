/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_ec2::types::{ArchitectureValues, InstanceType, PlatformValues, ShutdownBehavior};

use crate::operation::upload_image::UploadImageOutput;
use crate::types::DiskImageFormat;

/// Input type for submitting an uploaded manifest as a conversion request
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ImportInstanceInput {
    /// The bucket holding the uploaded manifest and parts.
    pub bucket: Option<String>,

    /// The key of the uploaded import manifest.
    pub manifest_key: Option<String>,

    /// The image format recorded in the manifest.
    pub image_format: Option<DiskImageFormat>,

    /// Size of the source image in bytes.
    pub image_size_bytes: Option<u64>,

    /// Size in GiB of the volume the image converts into.
    pub volume_size_gib: Option<u64>,

    /// Description attached to the conversion task.
    pub description: Option<String>,

    /// The platform of the imported instance.
    pub platform: Option<PlatformValues>,

    /// The instance type to launch.
    pub instance_type: Option<InstanceType>,

    /// The architecture of the imported instance.
    pub architecture: Option<ArchitectureValues>,

    /// Availability zone to launch the instance in.
    pub availability_zone: Option<String>,

    /// Security group names applied to the instance.
    pub group_names: Option<Vec<String>>,

    /// Whether detailed monitoring is enabled.
    pub monitoring: Option<bool>,

    /// The subnet to launch the instance in.
    pub subnet_id: Option<String>,

    /// Primary private IP address of the instance.
    pub private_ip_address: Option<String>,

    /// Base64-encoded user data made available to the instance.
    pub user_data: Option<String>,

    /// Behavior when the instance shuts itself down.
    pub instance_initiated_shutdown_behavior: Option<ShutdownBehavior>,

    /// Reserved for additional launch information.
    pub additional_info: Option<String>,
}

impl ImportInstanceInput {
    /// Builder pre-populated from a completed upload, ready for launch
    /// configuration.
    pub fn from_upload(upload: &UploadImageOutput) -> ImportInstanceInputBuilder {
        ImportInstanceInputBuilder::default()
            .bucket(upload.bucket())
            .manifest_key(upload.manifest_key())
            .image_format(upload.image_format().clone())
            .image_size_bytes(upload.image_size_bytes())
            .volume_size_gib(upload.volume_size_gib())
    }

    /// Builder for the two-phase "upload now, convert later" flow: the
    /// manifest was uploaded earlier (possibly by another invocation) and no
    /// local image file is needed.
    pub fn from_existing_manifest(
        bucket: impl Into<String>,
        manifest_key: impl Into<String>,
    ) -> ImportInstanceInputBuilder {
        ImportInstanceInputBuilder::default()
            .bucket(bucket)
            .manifest_key(manifest_key)
    }

    /// The bucket holding the uploaded manifest and parts.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The key of the uploaded import manifest.
    pub fn manifest_key(&self) -> Option<&str> {
        self.manifest_key.as_deref()
    }

    /// The image format recorded in the manifest.
    pub fn image_format(&self) -> Option<&DiskImageFormat> {
        self.image_format.as_ref()
    }

    /// Size of the source image in bytes.
    pub fn image_size_bytes(&self) -> Option<u64> {
        self.image_size_bytes
    }

    /// Size in GiB of the volume the image converts into.
    pub fn volume_size_gib(&self) -> Option<u64> {
        self.volume_size_gib
    }

    /// Description attached to the conversion task.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The instance type to launch.
    pub fn instance_type(&self) -> Option<&InstanceType> {
        self.instance_type.as_ref()
    }
}

/// A builder for [ImportInstanceInput]
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct ImportInstanceInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) manifest_key: Option<String>,
    pub(crate) image_format: Option<DiskImageFormat>,
    pub(crate) image_size_bytes: Option<u64>,
    pub(crate) volume_size_gib: Option<u64>,
    pub(crate) description: Option<String>,
    pub(crate) platform: Option<PlatformValues>,
    pub(crate) instance_type: Option<InstanceType>,
    pub(crate) architecture: Option<ArchitectureValues>,
    pub(crate) availability_zone: Option<String>,
    pub(crate) group_names: Option<Vec<String>>,
    pub(crate) monitoring: Option<bool>,
    pub(crate) subnet_id: Option<String>,
    pub(crate) private_ip_address: Option<String>,
    pub(crate) user_data: Option<String>,
    pub(crate) instance_initiated_shutdown_behavior: Option<ShutdownBehavior>,
    pub(crate) additional_info: Option<String>,
}

impl ImportInstanceInputBuilder {
    /// The bucket holding the uploaded manifest and parts. Required.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// The key of the uploaded import manifest. Required.
    pub fn manifest_key(mut self, input: impl Into<String>) -> Self {
        self.manifest_key = Some(input.into());
        self
    }

    /// The image format recorded in the manifest. Required.
    pub fn image_format(mut self, input: DiskImageFormat) -> Self {
        self.image_format = Some(input);
        self
    }

    /// Size of the source image in bytes. Required.
    pub fn image_size_bytes(mut self, input: u64) -> Self {
        self.image_size_bytes = Some(input);
        self
    }

    /// Size in GiB of the volume the image converts into. Required.
    pub fn volume_size_gib(mut self, input: u64) -> Self {
        self.volume_size_gib = Some(input);
        self
    }

    /// Description attached to the conversion task.
    pub fn description(mut self, input: impl Into<String>) -> Self {
        self.description = Some(input.into());
        self
    }

    /// The platform of the imported instance. Required; the conversion
    /// service only accepts instance imports with an explicit platform.
    pub fn platform(mut self, input: PlatformValues) -> Self {
        self.platform = Some(input);
        self
    }

    /// The instance type to launch. Required.
    pub fn instance_type(mut self, input: InstanceType) -> Self {
        self.instance_type = Some(input);
        self
    }

    /// The architecture of the imported instance.
    pub fn architecture(mut self, input: ArchitectureValues) -> Self {
        self.architecture = Some(input);
        self
    }

    /// Availability zone to launch the instance in.
    pub fn availability_zone(mut self, input: impl Into<String>) -> Self {
        self.availability_zone = Some(input.into());
        self
    }

    /// Append a security group name applied to the instance.
    pub fn group_name(mut self, input: impl Into<String>) -> Self {
        self.group_names
            .get_or_insert_with(Vec::new)
            .push(input.into());
        self
    }

    /// Whether detailed monitoring is enabled.
    pub fn monitoring(mut self, input: bool) -> Self {
        self.monitoring = Some(input);
        self
    }

    /// The subnet to launch the instance in.
    pub fn subnet_id(mut self, input: impl Into<String>) -> Self {
        self.subnet_id = Some(input.into());
        self
    }

    /// Primary private IP address of the instance.
    pub fn private_ip_address(mut self, input: impl Into<String>) -> Self {
        self.private_ip_address = Some(input.into());
        self
    }

    /// Base64-encoded user data made available to the instance.
    pub fn user_data(mut self, input: impl Into<String>) -> Self {
        self.user_data = Some(input.into());
        self
    }

    /// Behavior when the instance shuts itself down.
    pub fn instance_initiated_shutdown_behavior(mut self, input: ShutdownBehavior) -> Self {
        self.instance_initiated_shutdown_behavior = Some(input);
        self
    }

    /// Consumes the builder and constructs an [`ImportInstanceInput`]
    pub fn build(
        self,
    ) -> Result<ImportInstanceInput, ::aws_smithy_types::error::operation::BuildError> {
        use ::aws_smithy_types::error::operation::BuildError;

        let bucket = self
            .bucket
            .ok_or(BuildError::missing_field("bucket", "a bucket is required"))?;
        let manifest_key = self.manifest_key.ok_or(BuildError::missing_field(
            "manifest_key",
            "an uploaded manifest key is required",
        ))?;
        let image_format = self.image_format.ok_or(BuildError::missing_field(
            "image_format",
            "the manifest's image format is required",
        ))?;
        let image_size_bytes = self.image_size_bytes.ok_or(BuildError::missing_field(
            "image_size_bytes",
            "the image size recorded in the manifest is required",
        ))?;
        let volume_size_gib = self.volume_size_gib.ok_or(BuildError::missing_field(
            "volume_size_gib",
            "the target volume size is required",
        ))?;
        let instance_type = self.instance_type.ok_or(BuildError::missing_field(
            "instance_type",
            "an instance type is required",
        ))?;
        let platform = self.platform.ok_or(BuildError::missing_field(
            "platform",
            "the instance platform is required",
        ))?;

        Ok(ImportInstanceInput {
            bucket: Some(bucket),
            manifest_key: Some(manifest_key),
            image_format: Some(image_format),
            image_size_bytes: Some(image_size_bytes),
            volume_size_gib: Some(volume_size_gib),
            description: self.description,
            platform: Some(platform),
            instance_type: Some(instance_type),
            architecture: self.architecture,
            availability_zone: self.availability_zone,
            group_names: self.group_names,
            monitoring: self.monitoring,
            subnet_id: self.subnet_id,
            private_ip_address: self.private_ip_address,
            user_data: self.user_data,
            instance_initiated_shutdown_behavior: self.instance_initiated_shutdown_behavior,
            additional_info: self.additional_info,
        })
    }
}
