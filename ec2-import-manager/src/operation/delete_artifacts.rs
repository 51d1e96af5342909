/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
pub use input::{DeleteArtifactsInput, DeleteArtifactsInputBuilder};

mod output;
pub use output::DeleteArtifactsOutput;

use std::sync::Arc;

use aws_sdk_ec2::types::{ConversionTask, ConversionTaskState};
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

use crate::error::{self, Error};
use crate::manifest::MANIFEST_FILE_NAME;
use crate::operation::list_key_space;
use crate::types::ArtifactSelector;

/// Maximum number of keys a single `DeleteObjects` request accepts
const MAX_DELETE_BATCH: usize = 1000;

/// Operation struct for deleting uploaded import artifacts
#[derive(Clone, Default, Debug)]
pub(crate) struct DeleteArtifacts;

impl DeleteArtifacts {
    /// Execute a single `DeleteArtifacts` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: DeleteArtifactsInput,
    ) -> Result<DeleteArtifactsOutput, Error> {
        let selector = input.selector().expect("selector set").clone();
        let targets = resolve_selector(&handle, selector, input.ignore_active_task()).await?;

        let s3_client = handle.config.s3_client();
        let mut objects_deleted = 0;
        let mut key_spaces_removed = Vec::with_capacity(targets.len());
        for (bucket, manifest_key) in targets {
            let key_space = key_space_of(&manifest_key);
            objects_deleted += delete_key_space(s3_client, &bucket, &key_space).await?;
            key_spaces_removed.push(format!("s3://{bucket}/{key_space}"));
        }

        Ok(DeleteArtifactsOutput {
            objects_deleted,
            key_spaces_removed,
        })
    }
}

/// Resolve the selector to `(bucket, manifest key)` pairs.
///
/// Task IDs go through `DescribeConversionTasks` first; a task that is still
/// active refuses deletion unless the caller opted to ignore that.
async fn resolve_selector(
    handle: &crate::client::Handle,
    selector: ArtifactSelector,
    ignore_active_task: bool,
) -> Result<Vec<(String, String)>, Error> {
    match selector {
        ArtifactSelector::ManifestKeys { bucket, keys } => Ok(keys
            .into_iter()
            .map(|key| (bucket.clone(), key))
            .collect()),
        ArtifactSelector::ManifestUrls(urls) => {
            urls.iter().map(|url| parse_manifest_url(url)).collect()
        }
        ArtifactSelector::ConversionTasks(task_ids) => {
            let resp = handle
                .config
                .ec2_client()
                .describe_conversion_tasks()
                .set_conversion_task_ids(Some(task_ids))
                .send()
                .await?;

            let mut targets = Vec::new();
            for task in resp.conversion_tasks() {
                if task_is_active(task) && !ignore_active_task {
                    return Err(error::active_conversion_task(
                        task.conversion_task_id().unwrap_or_default(),
                    ));
                }
                for url in manifest_urls_of(task) {
                    targets.push(parse_manifest_url(&url)?);
                }
            }
            Ok(targets)
        }
    }
}

fn task_is_active(task: &ConversionTask) -> bool {
    matches!(
        task.state(),
        Some(ConversionTaskState::Active | ConversionTaskState::Cancelling)
    )
}

/// Every import manifest URL referenced by a conversion task, covering both
/// instance and volume imports.
fn manifest_urls_of(task: &ConversionTask) -> Vec<String> {
    let mut urls = Vec::new();
    if let Some(details) = task.import_instance() {
        for volume in details.volumes() {
            if let Some(url) = volume.image().and_then(|image| image.import_manifest_url()) {
                urls.push(url.to_owned());
            }
        }
    }
    if let Some(details) = task.import_volume() {
        if let Some(url) = details.image().and_then(|image| image.import_manifest_url()) {
            urls.push(url.to_owned());
        }
    }
    urls
}

/// The key prefix covering a manifest and its parts.
fn key_space_of(manifest_key: &str) -> String {
    match manifest_key.strip_suffix(MANIFEST_FILE_NAME) {
        Some(base) => base.to_owned(),
        // not a key this crate generated; fall back to the key's parent
        None => match manifest_key.rsplit_once('/') {
            Some((parent, _)) => format!("{parent}/"),
            None => manifest_key.to_owned(),
        },
    }
}

/// Extract `(bucket, key)` from an S3 object URL, presigned or plain.
///
/// Both virtual-hosted (`https://bucket.s3.region.amazonaws.com/key`) and
/// path-style (`https://s3.region.amazonaws.com/bucket/key`) forms are
/// accepted; any query string is ignored.
fn parse_manifest_url(url: &str) -> Result<(String, String), Error> {
    let remainder = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| error::invalid_input(format!("`{url}` is not an S3 object URL")))?;

    let (host, path_and_query) = remainder
        .split_once('/')
        .ok_or_else(|| error::invalid_input(format!("`{url}` has no object path")))?;
    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    let (bucket, key) = if host.starts_with("s3.") || host.starts_with("s3-") {
        path.split_once('/')
            .ok_or_else(|| error::invalid_input(format!("`{url}` has no key after the bucket")))?
    } else if let Some((bucket, _)) = host.split_once(".s3") {
        (bucket, path)
    } else {
        return Err(error::invalid_input(format!(
            "`{url}` is not a recognized S3 endpoint"
        )));
    };

    if bucket.is_empty() || key.is_empty() {
        return Err(error::invalid_input(format!(
            "`{url}` is missing a bucket or key"
        )));
    }
    Ok((bucket.to_owned(), key.to_owned()))
}

/// Delete every object under `prefix`.
///
/// Idempotent: an empty listing (or one emptied by a concurrent delete) is
/// success, not an error.
pub(crate) async fn delete_key_space(
    s3_client: &aws_sdk_s3::Client,
    bucket: &str,
    prefix: &str,
) -> Result<u64, Error> {
    let objects = list_key_space(s3_client, bucket, prefix).await?;
    if objects.is_empty() {
        tracing::debug!("no objects under {prefix}; nothing to delete");
        return Ok(0);
    }

    let mut deleted = 0;
    for chunk in objects.chunks(MAX_DELETE_BATCH) {
        let identifiers = chunk
            .iter()
            .map(|(key, _)| ObjectIdentifier::builder().key(key).build())
            .collect::<Result<Vec<_>, _>>()?;

        s3_client
            .delete_objects()
            .bucket(bucket)
            .delete(
                Delete::builder()
                    .set_objects(Some(identifiers))
                    .quiet(true)
                    .build()?,
            )
            .send()
            .await?;
        deleted += chunk.len() as u64;
    }

    tracing::debug!("deleted {deleted} object(s) under {prefix}");
    Ok(deleted)
}

#[cfg(test)]
mod test {
    use super::{key_space_of, parse_manifest_url};

    #[test]
    fn test_parse_virtual_hosted_url() {
        let (bucket, key) = parse_manifest_url(
            "https://my-bucket.s3.us-west-2.amazonaws.com/images/abc/manifest.xml?X-Amz-Expires=3600&X-Amz-Signature=deadbeef",
        )
        .unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(key, "images/abc/manifest.xml");
    }

    #[test]
    fn test_parse_virtual_hosted_url_global_endpoint() {
        let (bucket, key) =
            parse_manifest_url("https://my-bucket.s3.amazonaws.com/abc/manifest.xml").unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(key, "abc/manifest.xml");
    }

    #[test]
    fn test_parse_path_style_url() {
        let (bucket, key) = parse_manifest_url(
            "https://s3.eu-central-1.amazonaws.com/my-bucket/images/abc/manifest.xml",
        )
        .unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(key, "images/abc/manifest.xml");
    }

    #[test]
    fn test_parse_legacy_dashed_region_url() {
        let (bucket, key) =
            parse_manifest_url("https://s3-us-west-1.amazonaws.com/my-bucket/abc/manifest.xml")
                .unwrap();
        assert_eq!(bucket, "my-bucket");
        assert_eq!(key, "abc/manifest.xml");
    }

    #[test]
    fn test_parse_rejects_non_s3_urls() {
        assert!(parse_manifest_url("ftp://example.com/whatever").is_err());
        assert!(parse_manifest_url("https://example.com/whatever").is_err());
        assert!(parse_manifest_url("https://my-bucket.s3.amazonaws.com/").is_err());
    }

    #[test]
    fn test_key_space_of_manifest_key() {
        assert_eq!(key_space_of("images/abc/manifest.xml"), "images/abc/");
        assert_eq!(key_space_of("abc/manifest.xml"), "abc/");
    }

    #[test]
    fn test_key_space_of_foreign_key_uses_parent() {
        assert_eq!(key_space_of("images/abc/other.xml"), "images/abc/");
        assert_eq!(key_space_of("flat-object"), "flat-object");
    }
}
