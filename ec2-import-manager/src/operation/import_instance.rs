/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
pub use input::{ImportInstanceInput, ImportInstanceInputBuilder};

mod output;
pub use output::ImportInstanceOutput;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_ec2::types::{
    DiskImage, DiskImageDetail, ImportInstanceLaunchSpecification, Placement, UserData,
    VolumeDetail,
};
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::Instrument;

use crate::error::{self, Error};
use crate::manifest::{presign_validity, DEFAULT_URL_EXPIRATION_DAYS};

/// Operation struct for submitting a conversion request
#[derive(Clone, Default, Debug)]
pub(crate) struct ImportInstance;

impl ImportInstance {
    /// Execute a single `ImportInstance` operation.
    ///
    /// One request, no internal retry: if submission fails the uploaded
    /// manifest and parts are untouched and the caller may submit again with
    /// the same manifest key.
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: ImportInstanceInput,
    ) -> Result<ImportInstanceOutput, Error> {
        let bucket = input.bucket().expect("bucket set").to_owned();
        let manifest_key = input.manifest_key().expect("manifest key set").to_owned();

        // the conversion service fetches the manifest through this URL
        let presigning = PresigningConfig::expires_in(presign_validity(Duration::from_secs(
            DEFAULT_URL_EXPIRATION_DAYS * 24 * 60 * 60,
        )))
        .map_err(error::invalid_input)?;
        let manifest_url = handle
            .config
            .s3_client()
            .get_object()
            .bucket(&bucket)
            .key(&manifest_key)
            .presigned(presigning)
            .await?
            .uri()
            .to_string();

        let format = input.image_format().expect("image format set");
        let image = DiskImageDetail::builder()
            .format(aws_sdk_ec2::types::DiskImageFormat::from(format.as_str()))
            .bytes(input.image_size_bytes().expect("image size set") as i64)
            .import_manifest_url(manifest_url)
            .build()?;
        let volume = VolumeDetail::builder()
            .size(input.volume_size_gib().expect("volume size set") as i64)
            .build()?;
        let disk_image = DiskImage::builder()
            .image(image)
            .volume(volume)
            .set_description(input.description.clone())
            .build();

        let resp = handle
            .config
            .ec2_client()
            .import_instance()
            .set_description(input.description.clone())
            .set_platform(input.platform.clone())
            .launch_specification(launch_specification(&input))
            .disk_images(disk_image)
            .send()
            .instrument(tracing::debug_span!("send-import-instance"))
            .await
            .map_err(|err| error::conversion_request_failed(bucket.clone(), manifest_key.clone(), err))?;

        let conversion_task = resp.conversion_task;
        tracing::debug!(
            "conversion task {:?} issued for manifest {}",
            conversion_task
                .as_ref()
                .and_then(|task| task.conversion_task_id()),
            manifest_key
        );

        Ok(ImportInstanceOutput { conversion_task })
    }
}

fn launch_specification(input: &ImportInstanceInput) -> ImportInstanceLaunchSpecification {
    let mut builder = ImportInstanceLaunchSpecification::builder()
        .set_instance_type(input.instance_type.clone())
        .set_architecture(input.architecture.clone())
        .set_group_names(input.group_names.clone())
        .set_subnet_id(input.subnet_id.clone())
        .set_monitoring(input.monitoring)
        .set_private_ip_address(input.private_ip_address.clone())
        .set_instance_initiated_shutdown_behavior(
            input.instance_initiated_shutdown_behavior.clone(),
        )
        .set_additional_info(input.additional_info.clone());

    if let Some(availability_zone) = &input.availability_zone {
        builder = builder.placement(
            Placement::builder()
                .availability_zone(availability_zone)
                .build(),
        );
    }
    if let Some(user_data) = &input.user_data {
        builder = builder.user_data(UserData::builder().data(user_data).build());
    }

    builder.build()
}
