/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
pub use input::{UploadImageInput, UploadImageInputBuilder};

mod output;
pub use output::UploadImageOutput;

mod context;
mod service;

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use crate::error::{self, Error};
use crate::manifest::{self, ImagePart, ImportManifest, DEFAULT_URL_EXPIRATION_DAYS};
use crate::operation::list_key_space;
use crate::resume::ResumeMemoStore;
use crate::types::{DiskImageFormat, FailedUploadPolicy, ProgressUpdate};
use crate::{DEFAULT_UPLOAD_CONCURRENCY, MAX_UPLOAD_CONCURRENCY};

use context::{UploadImageContext, UploadImageState};

/// Operation struct for uploading a disk image
#[derive(Clone, Default, Debug)]
pub(crate) struct UploadImage;

impl UploadImage {
    /// Execute a single `UploadImage` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: UploadImageInput,
    ) -> Result<UploadImageOutput, Error> {
        let source = input.source().expect("source set").to_owned();
        let bucket = input.bucket().expect("bucket set").to_owned();

        notify_listener(&input, "validating disk image", None);
        let job = resolve_job(&input).await?;
        if let Some(warning) = &job.format_warning {
            tracing::warn!("{warning}");
            notify_listener(&input, warning.clone(), None);
        }

        let store = handle.memo_store();
        let plan = if input.resume() {
            resumed_upload_plan(handle.config.s3_client(), &store, &source, &bucket, &job).await?
        } else {
            fresh_upload_plan(input.key_prefix(), &job)
        };

        let total_parts = plan.manifest.parts().len() as u64;
        let already_present = total_parts - plan.outstanding.len() as u64;

        let state = UploadImageState {
            input: input.clone(),
            bucket: bucket.clone(),
            source: source.clone(),
            manifest: plan.manifest.clone(),
            concurrency: job.concurrency,
            total_parts,
            completed_parts: AtomicU64::new(already_present),
        };
        let ctx = UploadImageContext::new(handle, state);

        match execute_upload(&ctx, plan.manifest_present, plan.outstanding).await {
            Ok(()) => {
                store.clear(&source, &bucket);
                ctx.notify("upload complete", Some(100));
                tracing::debug!(
                    "upload of {:?} completed with manifest key {}",
                    source,
                    plan.manifest.key()
                );
                Ok(UploadImageOutput {
                    bucket,
                    manifest_key: plan.manifest.key().to_owned(),
                    image_format: job.format,
                    image_size_bytes: job.image_size,
                    volume_size_gib: job.volume_size_gib,
                    parts_total: total_parts,
                    parts_uploaded: total_parts - already_present,
                })
            }
            Err(err) => Err(fail_upload(&ctx, &store, err).await),
        }
    }
}

/// Caller configuration resolved against the local image file, with nothing
/// mutated in place: derived values are carried here, not written back into
/// the input.
#[derive(Debug)]
struct ResolvedJob {
    image_size: u64,
    format: DiskImageFormat,
    format_warning: Option<String>,
    volume_size_gib: u64,
    concurrency: usize,
    url_expiration: Duration,
}

/// Validate the input and resolve derived values. Performs no network calls.
async fn resolve_job(input: &UploadImageInput) -> Result<ResolvedJob, Error> {
    let source = input.source().expect("source set");

    let metadata = tokio::fs::metadata(source).await.map_err(|err| {
        error::invalid_input(format!("disk image {source:?} is not readable: {err}"))
    })?;
    if !metadata.is_file() {
        return Err(error::invalid_input(format!(
            "disk image {source:?} is not a regular file"
        )));
    }
    let image_size = metadata.len();
    if image_size == 0 {
        return Err(error::invalid_input(format!(
            "disk image {source:?} is empty"
        )));
    }

    let concurrency = match input.upload_concurrency() {
        None => DEFAULT_UPLOAD_CONCURRENCY,
        Some(0) => {
            return Err(error::invalid_input(
                "upload concurrency must be at least 1",
            ))
        }
        Some(requested) if requested > MAX_UPLOAD_CONCURRENCY => {
            // matches the long-standing behavior of the import tooling: an
            // over-limit request falls back to the default, not the maximum
            tracing::warn!(
                "requested upload concurrency {requested} exceeds the maximum of {MAX_UPLOAD_CONCURRENCY}; using the default of {DEFAULT_UPLOAD_CONCURRENCY}"
            );
            DEFAULT_UPLOAD_CONCURRENCY
        }
        Some(requested) => requested,
    };

    let url_expiration_days = match input.url_expiration_days() {
        None => DEFAULT_URL_EXPIRATION_DAYS,
        Some(0) => {
            return Err(error::invalid_input(
                "URL expiration must be at least one day",
            ))
        }
        Some(days) => days,
    };

    let format = match input.format() {
        Some(format) => format.clone(),
        None => DiskImageFormat::from_extension(source),
    };
    let format_warning = (!format.is_supported()).then(|| {
        format!(
            "image format {format} is not in the supported set (VMDK, RAW, VHD); the conversion service may reject it"
        )
    });

    let volume_size_gib = input
        .volume_size_gib()
        .unwrap_or_else(|| manifest::derived_volume_size_gib(image_size));

    Ok(ResolvedJob {
        image_size,
        format,
        format_warning,
        volume_size_gib,
        concurrency,
        url_expiration: Duration::from_secs(url_expiration_days * 24 * 60 * 60),
    })
}

/// The work left to do for one invocation: the manifest describing the key
/// space plus whichever parts are not in the bucket yet.
#[derive(Debug)]
struct UploadPlan {
    manifest: ImportManifest,
    outstanding: Vec<ImagePart>,
    manifest_present: bool,
}

fn fresh_upload_plan(key_prefix: Option<&str>, job: &ResolvedJob) -> UploadPlan {
    let manifest = ImportManifest::plan(
        key_prefix,
        job.format.clone(),
        job.image_size,
        job.volume_size_gib,
        job.url_expiration,
    );
    let outstanding = manifest.parts().to_vec();
    UploadPlan {
        manifest,
        outstanding,
        manifest_present: false,
    }
}

/// Reconstruct upload state for a resumed job from its memo and whatever
/// already made it to the bucket.
async fn resumed_upload_plan(
    s3_client: &aws_sdk_s3::Client,
    store: &ResumeMemoStore,
    source: &Path,
    bucket: &str,
    job: &ResolvedJob,
) -> Result<UploadPlan, Error> {
    let manifest_key = store
        .read(source, bucket)?
        .ok_or_else(|| error::resume_state_not_found(source, bucket))?;
    tracing::debug!("resuming upload from manifest key {manifest_key}");

    let manifest = ImportManifest::for_existing_key(
        &manifest_key,
        job.format.clone(),
        job.image_size,
        job.volume_size_gib,
        job.url_expiration,
    )?;

    let existing: HashMap<String, i64> = list_key_space(s3_client, bucket, manifest.key_space())
        .await?
        .into_iter()
        .collect();

    // a part that exists with the wrong size is re-uploaded
    let outstanding: Vec<ImagePart> = manifest
        .parts()
        .iter()
        .filter(|part| existing.get(part.key()) != Some(&(part.size_bytes() as i64)))
        .cloned()
        .collect();
    let manifest_present = existing.contains_key(manifest.key());

    tracing::debug!(
        "resume found {} of {} parts already uploaded",
        manifest.parts().len() - outstanding.len(),
        manifest.parts().len()
    );

    Ok(UploadPlan {
        manifest,
        outstanding,
        manifest_present,
    })
}

/// Upload the manifest (unless a resumed job found it in place) and then the
/// outstanding parts.
async fn execute_upload(
    ctx: &UploadImageContext,
    manifest_present: bool,
    outstanding: Vec<ImagePart>,
) -> Result<(), Error> {
    if !manifest_present {
        ctx.notify("uploading import manifest", None);
        let xml = ctx
            .state
            .manifest
            .render_xml(ctx.s3_client(), &ctx.state.bucket)
            .await?;
        ctx.s3_client()
            .put_object()
            .bucket(&ctx.state.bucket)
            .key(ctx.state.manifest.key())
            .content_length(xml.len() as i64)
            .body(ByteStream::from(Bytes::from(xml.into_bytes())))
            .send()
            .await?;
        tracing::trace!("import manifest uploaded");
    }

    ctx.notify(
        format!("uploading {} image part(s)", outstanding.len()),
        None,
    );
    service::upload_parts(ctx.clone(), outstanding).await
}

/// Apply the job's failure policy after the first part failure abandoned the
/// remaining work, and produce the error the caller sees.
async fn fail_upload(ctx: &UploadImageContext, store: &ResumeMemoStore, cause: Error) -> Error {
    let bucket = &ctx.state.bucket;
    let manifest_key = ctx.state.manifest.key();

    match ctx.state.input.failure_policy() {
        FailedUploadPolicy::Rollback => {
            ctx.notify("upload failed; removing uploaded artifacts", None);
            match crate::operation::delete_artifacts::delete_key_space(
                ctx.s3_client(),
                bucket,
                ctx.state.manifest.key_space(),
            )
            .await
            {
                Ok(deleted) => tracing::debug!("rolled back {deleted} uploaded object(s)"),
                // best-effort cleanup; the upload failure is still the error
                // the caller needs to see
                Err(cleanup_err) => tracing::error!(
                    "failed to roll back artifacts under {}: {}",
                    ctx.state.manifest.key_space(),
                    cleanup_err
                ),
            }
            error::upload_failed(bucket.clone(), manifest_key, false, cause)
        }
        FailedUploadPolicy::Retain => {
            ctx.notify("upload failed; artifacts retained for resume", None);
            if let Err(memo_err) = store.write(&ctx.state.source, bucket, manifest_key) {
                // without the memo a resume is impossible; the caller must
                // learn that before anything else
                tracing::error!("upload failed ({cause}) and the resume memo could not be written");
                return memo_err;
            }
            error::upload_failed(bucket.clone(), manifest_key, true, cause)
        }
    }
}

fn notify_listener(input: &UploadImageInput, message: impl Into<String>, percent: Option<u8>) {
    if let Some(listener) = input.progress_listener() {
        listener.notify(ProgressUpdate::new(message, percent));
    }
}

#[cfg(test)]
mod test {
    use super::{resolve_job, UploadImageInput};
    use crate::error::ErrorKind;
    use crate::types::DiskImageFormat;
    use crate::DEFAULT_UPLOAD_CONCURRENCY;
    use std::io::Write;

    fn base_input(path: &std::path::Path) -> UploadImageInput {
        super::UploadImageInputBuilder::default()
            .source(path)
            .bucket("test-bucket")
            .build()
            .unwrap()
    }

    fn image_file(name: &str, len: usize) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![0u8; len]).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_resolve_defaults() {
        let (_dir, path) = image_file("disk.vmdk", 64);
        let job = resolve_job(&base_input(&path)).await.unwrap();
        assert_eq!(job.concurrency, DEFAULT_UPLOAD_CONCURRENCY);
        assert_eq!(job.format, DiskImageFormat::Vmdk);
        assert!(job.format_warning.is_none());
        assert_eq!(job.image_size, 64);
        assert_eq!(job.volume_size_gib, 8);
        assert_eq!(job.url_expiration.as_secs(), 30 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn test_resolve_rejects_zero_concurrency() {
        let (_dir, path) = image_file("disk.vmdk", 64);
        let mut input = base_input(&path);
        input.upload_concurrency = Some(0);
        let err = resolve_job(&input).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InputInvalid);
    }

    #[tokio::test]
    async fn test_resolve_downgrades_excess_concurrency_to_default() {
        let (_dir, path) = image_file("disk.vmdk", 64);
        let mut input = base_input(&path);
        input.upload_concurrency = Some(31);
        let job = resolve_job(&input).await.unwrap();
        assert_eq!(job.concurrency, DEFAULT_UPLOAD_CONCURRENCY);

        input.upload_concurrency = Some(30);
        let job = resolve_job(&input).await.unwrap();
        assert_eq!(job.concurrency, 30);
    }

    #[tokio::test]
    async fn test_resolve_rejects_zero_expiration() {
        let (_dir, path) = image_file("disk.vmdk", 64);
        let mut input = base_input(&path);
        input.url_expiration_days = Some(0);
        let err = resolve_job(&input).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InputInvalid);
    }

    #[tokio::test]
    async fn test_resolve_unrecognized_extension_warns_but_succeeds() {
        let (_dir, path) = image_file("image.qcow2", 64);
        let job = resolve_job(&base_input(&path)).await.unwrap();
        assert_eq!(job.format, DiskImageFormat::Other("QCOW2".to_owned()));
        assert!(job.format_warning.is_some());
    }

    #[tokio::test]
    async fn test_resolve_missing_file_is_invalid_input() {
        let input = base_input(std::path::Path::new("/definitely/missing/disk.vmdk"));
        let err = resolve_job(&input).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InputInvalid);
    }

    #[tokio::test]
    async fn test_resolve_empty_file_is_invalid_input() {
        let (_dir, path) = image_file("disk.vmdk", 0);
        let err = resolve_job(&base_input(&path)).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InputInvalid);
    }

    #[tokio::test]
    async fn test_resolve_passes_explicit_volume_size_through() {
        let (_dir, path) = image_file("disk.raw", 64);
        let mut input = base_input(&path);
        input.volume_size_gib = Some(100);
        let job = resolve_job(&input).await.unwrap();
        assert_eq!(job.volume_size_gib, 100);
    }
}
