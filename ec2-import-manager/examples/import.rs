/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::path::PathBuf;

use aws_sdk_ec2::types::{InstanceType, PlatformValues};
use clap::Parser;
use ec2_import_manager::operation::import_instance::ImportInstanceInput;
use ec2_import_manager::types::{ArtifactSelector, FailedUploadPolicy, ProgressUpdate};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "import")]
#[command(about = "Uploads a local disk image to S3 and imports it into EC2.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Upload a disk image and its import manifest to S3
    Upload {
        /// Local disk image to upload
        source: PathBuf,

        /// Bucket to upload into
        bucket: String,

        /// Key prefix for the manifest key space
        #[arg(long)]
        key_prefix: Option<String>,

        /// Continue a previously interrupted upload
        #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
        resume: bool,

        /// Keep uploaded artifacts on failure so the upload can be resumed
        #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
        retain_on_error: bool,

        /// Concurrent part uploads (1-30)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Submit an uploaded manifest as an EC2 conversion request
    Import {
        /// Bucket holding the uploaded manifest
        bucket: String,

        /// Key of the uploaded manifest
        manifest_key: String,

        /// Image format recorded in the manifest (VMDK, RAW, VHD)
        #[arg(long)]
        format: String,

        /// Size of the source image in bytes
        #[arg(long)]
        image_bytes: u64,

        /// Target volume size in GiB
        #[arg(long)]
        volume_size: u64,

        /// Instance type to launch
        #[arg(long, default_value = "m5.large")]
        instance_type: String,

        /// Platform of the imported instance
        #[arg(long, default_value = "windows")]
        platform: String,
    },

    /// Delete an uploaded manifest and its parts
    Cleanup {
        /// Bucket holding the artifacts
        bucket: String,

        /// Key of the manifest to remove
        manifest_key: String,

        /// Delete even if the owning conversion task is still active
        #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
        ignore_active_task: bool,
    },
}

fn print_progress(update: ProgressUpdate) {
    match update.percent_complete() {
        Some(pct) => println!("[{pct:>3}%] {}", update.message()),
        None => println!("       {}", update.message()),
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ec2_import_manager::from_env().load().await;
    let client = ec2_import_manager::Client::new(config);

    match args.command {
        Command::Upload {
            source,
            bucket,
            key_prefix,
            resume,
            retain_on_error,
            concurrency,
        } => {
            let mut request = client
                .upload_image()
                .source(source)
                .bucket(bucket)
                .resume(resume)
                .progress_listener(print_progress);
            if let Some(prefix) = key_prefix {
                request = request.key_prefix(prefix);
            }
            if let Some(concurrency) = concurrency {
                request = request.upload_concurrency(concurrency);
            }
            if retain_on_error {
                request = request.failure_policy(FailedUploadPolicy::Retain);
            }

            let output = request.send().await?;
            println!(
                "uploaded {} part(s); manifest key: {}",
                output.parts_uploaded(),
                output.manifest_key()
            );
        }
        Command::Import {
            bucket,
            manifest_key,
            format,
            image_bytes,
            volume_size,
            instance_type,
            platform,
        } => {
            let output = ImportInstanceInput::from_existing_manifest(bucket, manifest_key)
                .image_format(parse_format(&format))
                .image_size_bytes(image_bytes)
                .volume_size_gib(volume_size)
                .platform(PlatformValues::from(platform.as_str()))
                .instance_type(InstanceType::from(instance_type.as_str()))
                .send_with(&client)
                .await?;
            println!(
                "conversion task issued: {}",
                output.conversion_task_id().unwrap_or("<none>")
            );
        }
        Command::Cleanup {
            bucket,
            manifest_key,
            ignore_active_task,
        } => {
            let output = client
                .delete_artifacts()
                .selector(ArtifactSelector::ManifestKeys {
                    bucket,
                    keys: vec![manifest_key],
                })
                .ignore_active_task(ignore_active_task)
                .send()
                .await?;
            println!("deleted {} object(s)", output.objects_deleted());
        }
    }

    Ok(())
}

fn parse_format(value: &str) -> ec2_import_manager::types::DiskImageFormat {
    use ec2_import_manager::types::DiskImageFormat;
    match value.to_ascii_uppercase().as_str() {
        "VMDK" => DiskImageFormat::Vmdk,
        "RAW" => DiskImageFormat::Raw,
        "VHD" => DiskImageFormat::Vhd,
        other => DiskImageFormat::Other(other.to_owned()),
    }
}
