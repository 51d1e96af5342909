/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! A client for importing local disk images into Amazon EC2.
//!
//! The import manager drives the legacy instance-import workflow end to end:
//! a local disk image is split into fixed-size parts and uploaded to Amazon S3
//! alongside an import manifest describing them, and the manifest is then
//! submitted to EC2 as an `ImportInstance` conversion request. Interrupted
//! uploads can be resumed from a small local memo rather than re-uploading
//! parts that already made it to S3.
//!
//! # Examples
//!
//! Load the default configuration:
//!
//! ```no_run
//! # async fn example() {
//! let config = ec2_import_manager::from_env().load().await;
//! let client = ec2_import_manager::Client::new(config);
//! # }
//! ```
//!
//! Upload a disk image and start a conversion task:
//!
//! ```no_run
//! # async fn example() -> Result<(), ec2_import_manager::error::Error> {
//! use ec2_import_manager::operation::import_instance::ImportInstanceInput;
//!
//! let config = ec2_import_manager::from_env().load().await;
//! let client = ec2_import_manager::Client::new(config);
//!
//! let upload = client
//!     .upload_image()
//!     .source("/tmp/disk.vmdk")
//!     .bucket("my-import-bucket")
//!     .send()
//!     .await?;
//!
//! let import = ImportInstanceInput::from_upload(&upload)
//!     .platform(aws_sdk_ec2::types::PlatformValues::Windows)
//!     .instance_type(aws_sdk_ec2::types::InstanceType::M5Large)
//!     .send_with(&client)
//!     .await?;
//!
//! println!("conversion task: {:?}", import.conversion_task());
//! # Ok(())
//! # }
//! ```
//!
//! See the documentation for each client operation for more information:
//!
//! * [`upload_image`](crate::Client::upload_image) - upload a disk image and its import manifest to S3
//! * [`import_instance`](crate::Client::import_instance) - submit an uploaded manifest as an EC2 conversion request
//! * [`delete_artifacts`](crate::Client::delete_artifacts) - remove a manifest and its parts from S3

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

pub(crate) const GIBIBYTE: u64 = 1024 * MEBIBYTE;

/// Default number of concurrent part uploads
pub(crate) const DEFAULT_UPLOAD_CONCURRENCY: usize = 10;

/// Maximum number of concurrent part uploads a single job may request
pub(crate) const MAX_UPLOAD_CONCURRENCY: usize = 30;

/// Error types emitted by `ec2-import-manager`
pub mod error;

/// Common types used by `ec2-import-manager`
pub mod types;

/// Import manager configuration
pub mod config;

/// Import manager client
pub mod client;

/// Import manifest layout and rendering
pub mod manifest;

/// Durable resume state for interrupted uploads
pub mod resume;

/// Import manager operations
pub mod operation;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
