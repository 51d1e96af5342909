/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_ec2::types::ConversionTask;

use crate::error::{self, Error};
use crate::resume::ResumeMemoStore;
use crate::Config;

/// Import manager client for Amazon EC2 disk image imports.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, env details, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// The memo store backing resume for this client.
    pub(crate) fn memo_store(&self) -> ResumeMemoStore {
        ResumeMemoStore::new(self.config.memo_dir())
    }
}

impl Client {
    /// Creates a new client from an import manager config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Upload a local disk image to Amazon S3 as an import manifest plus parts.
    ///
    /// Constructs a fluent builder for the
    /// [`UploadImage`](crate::operation::upload_image::builders::UploadImageFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ec2_import_manager::error::Error;
    ///
    /// async fn upload_image(client: &ec2_import_manager::Client) -> Result<(), Error> {
    ///     let output = client
    ///         .upload_image()
    ///         .source("/tmp/disk.vmdk")
    ///         .bucket("my-import-bucket")
    ///         .send()
    ///         .await?;
    ///
    ///     println!("uploaded manifest {}", output.manifest_key());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload_image(&self) -> crate::operation::upload_image::builders::UploadImageFluentBuilder {
        crate::operation::upload_image::builders::UploadImageFluentBuilder::new(self.handle.clone())
    }

    /// Submit an uploaded import manifest to EC2 as an `ImportInstance` conversion request.
    ///
    /// Constructs a fluent builder for the
    /// [`ImportInstance`](crate::operation::import_instance::builders::ImportInstanceFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ec2_import_manager::error::Error;
    ///
    /// async fn import(client: &ec2_import_manager::Client) -> Result<(), Error> {
    ///     let output = client
    ///         .import_instance()
    ///         .bucket("my-import-bucket")
    ///         .manifest_key("images/1a2b3c/manifest.xml")
    ///         .image_format(ec2_import_manager::types::DiskImageFormat::Vmdk)
    ///         .image_size_bytes(8_589_934_592)
    ///         .volume_size_gib(8)
    ///         .platform(aws_sdk_ec2::types::PlatformValues::Windows)
    ///         .instance_type(aws_sdk_ec2::types::InstanceType::M5Large)
    ///         .send()
    ///         .await?;
    ///
    ///     println!("conversion task: {:?}", output.conversion_task());
    ///     Ok(())
    /// }
    /// ```
    pub fn import_instance(
        &self,
    ) -> crate::operation::import_instance::builders::ImportInstanceFluentBuilder {
        crate::operation::import_instance::builders::ImportInstanceFluentBuilder::new(
            self.handle.clone(),
        )
    }

    /// Remove an uploaded manifest and all of its parts from Amazon S3.
    ///
    /// Constructs a fluent builder for the
    /// [`DeleteArtifacts`](crate::operation::delete_artifacts::builders::DeleteArtifactsFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ec2_import_manager::error::Error;
    /// use ec2_import_manager::types::ArtifactSelector;
    ///
    /// async fn cleanup(client: &ec2_import_manager::Client) -> Result<(), Error> {
    ///     client
    ///         .delete_artifacts()
    ///         .selector(ArtifactSelector::ManifestKeys {
    ///             bucket: "my-import-bucket".to_owned(),
    ///             keys: vec!["images/1a2b3c/manifest.xml".to_owned()],
    ///         })
    ///         .send()
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn delete_artifacts(
        &self,
    ) -> crate::operation::delete_artifacts::builders::DeleteArtifactsFluentBuilder {
        crate::operation::delete_artifacts::builders::DeleteArtifactsFluentBuilder::new(
            self.handle.clone(),
        )
    }

    /// Describe the conversion tasks with the given IDs.
    ///
    /// Thin passthrough for polling the task handle returned by
    /// [`import_instance`](Self::import_instance); EC2 owns the task
    /// lifecycle, this client only observes it.
    pub async fn describe_conversion_tasks(
        &self,
        task_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Vec<ConversionTask>, Error> {
        let resp = self
            .handle
            .config
            .ec2_client()
            .describe_conversion_tasks()
            .set_conversion_task_ids(Some(task_ids.into_iter().map(Into::into).collect()))
            .send()
            .await?;
        Ok(resp.conversion_tasks.unwrap_or_default())
    }

    /// Request cancellation of an active conversion task.
    ///
    /// Cancels the provider-side conversion only; uploaded artifacts stay in
    /// S3 until [`delete_artifacts`](Self::delete_artifacts) removes them.
    pub async fn cancel_conversion_task(&self, task_id: impl Into<String>) -> Result<(), Error> {
        let task_id = task_id.into();
        self.handle
            .config
            .ec2_client()
            .cancel_conversion_task()
            .conversion_task_id(&task_id)
            .send()
            .await
            .map_err(|err| {
                tracing::debug!("cancel of conversion task {task_id} failed");
                error::service_error(err)
            })?;
        Ok(())
    }
}
