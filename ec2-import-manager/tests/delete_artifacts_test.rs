/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::{Arc, Mutex};

use aws_sdk_ec2::operation::describe_conversion_tasks::DescribeConversionTasksOutput;
use aws_sdk_ec2::types::{
    ConversionTask, ConversionTaskState, DiskImageDescription, ImportInstanceTaskDetails,
    ImportInstanceVolumeDetailItem,
};
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::types::Object;
use aws_smithy_mocks_experimental::{mock, mock_client, Rule, RuleMode};
use ec2_import_manager::error::ErrorKind;
use ec2_import_manager::types::ArtifactSelector;

use test_utils::test_config;

const MANIFEST_KEY: &str = "images/cleanup-fixture/manifest.xml";
const KEY_SPACE: &str = "images/cleanup-fixture/";
const MANIFEST_URL: &str =
    "https://my-bucket.s3.us-east-1.amazonaws.com/images/cleanup-fixture/manifest.xml?X-Amz-Expires=3600";

fn artifact_listing() -> Rule {
    mock!(aws_sdk_s3::Client::list_objects_v2)
        .match_requests(|input| {
            input.bucket() == Some("my-bucket") && input.prefix() == Some(KEY_SPACE)
        })
        .then_output(|| {
            ListObjectsV2Output::builder()
                .contents(Object::builder().key(MANIFEST_KEY).size(1234).build())
                .contents(
                    Object::builder()
                        .key("images/cleanup-fixture/parts/0")
                        .size(1024)
                        .build(),
                )
                .contents(
                    Object::builder()
                        .key("images/cleanup-fixture/parts/1")
                        .size(1024)
                        .build(),
                )
                .build()
        })
}

fn delete_rule(deleted_keys: Arc<Mutex<Vec<String>>>) -> Rule {
    mock!(aws_sdk_s3::Client::delete_objects)
        .match_requests(move |input| {
            if let Some(delete) = input.delete() {
                deleted_keys.lock().unwrap().extend(
                    delete
                        .objects()
                        .iter()
                        .map(|object| object.key().to_owned()),
                );
            }
            true
        })
        .then_output(|| DeleteObjectsOutput::builder().build())
}

fn conversion_task(state: ConversionTaskState) -> ConversionTask {
    ConversionTask::builder()
        .conversion_task_id("import-i-fh95npoc")
        .state(state)
        .import_instance(
            ImportInstanceTaskDetails::builder()
                .volumes(
                    ImportInstanceVolumeDetailItem::builder()
                        .image(
                            DiskImageDescription::builder()
                                .import_manifest_url(MANIFEST_URL)
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .build()
}

#[tokio::test]
async fn test_delete_by_bucket_and_key_removes_the_key_space() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let rules = vec![artifact_listing(), delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        test_utils::noop_ec2_client(),
        memo_dir.path(),
    ));

    let output = client
        .delete_artifacts()
        .selector(ArtifactSelector::ManifestKeys {
            bucket: "my-bucket".to_owned(),
            keys: vec![MANIFEST_KEY.to_owned()],
        })
        .send()
        .await
        .unwrap();

    assert_eq!(output.objects_deleted(), 3);
    assert_eq!(
        output.key_spaces_removed(),
        [format!("s3://my-bucket/{KEY_SPACE}")]
    );

    let deleted = deleted_keys.lock().unwrap().clone();
    assert_eq!(deleted.len(), 3);
    assert!(deleted.contains(&MANIFEST_KEY.to_owned()));
}

#[tokio::test]
async fn test_delete_already_deleted_artifacts_is_a_noop() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let empty_listing = mock!(aws_sdk_s3::Client::list_objects_v2)
        .match_requests(|_| true)
        .then_output(|| ListObjectsV2Output::builder().build());
    let rules = vec![empty_listing, delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        test_utils::noop_ec2_client(),
        memo_dir.path(),
    ));

    let output = client
        .delete_artifacts()
        .selector(ArtifactSelector::ManifestKeys {
            bucket: "my-bucket".to_owned(),
            keys: vec![MANIFEST_KEY.to_owned()],
        })
        .send()
        .await
        .unwrap();

    assert_eq!(output.objects_deleted(), 0);
    assert!(deleted_keys.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_manifest_url_resolves_bucket_and_key() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let rules = vec![artifact_listing(), delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        test_utils::noop_ec2_client(),
        memo_dir.path(),
    ));

    let output = client
        .delete_artifacts()
        .selector(ArtifactSelector::ManifestUrls(vec![
            MANIFEST_URL.to_owned()
        ]))
        .send()
        .await
        .unwrap();

    assert_eq!(output.objects_deleted(), 3);
}

#[tokio::test]
async fn test_delete_by_active_task_is_refused() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let describe = mock!(aws_sdk_ec2::Client::describe_conversion_tasks)
        .match_requests(|_| true)
        .then_output(|| {
            DescribeConversionTasksOutput::builder()
                .conversion_tasks(conversion_task(ConversionTaskState::Active))
                .build()
        });
    let ec2_client = mock_client!(aws_sdk_ec2, RuleMode::MatchAny, &[&describe]);

    let rules = vec![artifact_listing(), delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        ec2_client,
        memo_dir.path(),
    ));

    let err = client
        .delete_artifacts()
        .selector(ArtifactSelector::ConversionTasks(vec![
            "import-i-fh95npoc".to_owned(),
        ]))
        .send()
        .await
        .unwrap_err();

    match err.kind() {
        ErrorKind::ActiveConversionTask(detail) => {
            assert_eq!(detail.task_id(), "import-i-fh95npoc");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
    assert!(deleted_keys.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_by_active_task_with_override_proceeds() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let describe = mock!(aws_sdk_ec2::Client::describe_conversion_tasks)
        .match_requests(|_| true)
        .then_output(|| {
            DescribeConversionTasksOutput::builder()
                .conversion_tasks(conversion_task(ConversionTaskState::Active))
                .build()
        });
    let ec2_client = mock_client!(aws_sdk_ec2, RuleMode::MatchAny, &[&describe]);

    let rules = vec![artifact_listing(), delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        ec2_client,
        memo_dir.path(),
    ));

    let output = client
        .delete_artifacts()
        .selector(ArtifactSelector::ConversionTasks(vec![
            "import-i-fh95npoc".to_owned(),
        ]))
        .ignore_active_task(true)
        .send()
        .await
        .unwrap();

    assert_eq!(output.objects_deleted(), 3);
}

#[tokio::test]
async fn test_delete_by_completed_task_needs_no_override() {
    let memo_dir = tempfile::tempdir().unwrap();
    let deleted_keys: Arc<Mutex<Vec<String>>> = Default::default();

    let describe = mock!(aws_sdk_ec2::Client::describe_conversion_tasks)
        .match_requests(|_| true)
        .then_output(|| {
            DescribeConversionTasksOutput::builder()
                .conversion_tasks(conversion_task(ConversionTaskState::Completed))
                .build()
        });
    let ec2_client = mock_client!(aws_sdk_ec2, RuleMode::MatchAny, &[&describe]);

    let rules = vec![artifact_listing(), delete_rule(deleted_keys.clone())];
    let s3_client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &rules);

    let client = ec2_import_manager::Client::new(test_config(
        s3_client,
        ec2_client,
        memo_dir.path(),
    ));

    let output = client
        .delete_artifacts()
        .selector(ArtifactSelector::ConversionTasks(vec![
            "import-i-fh95npoc".to_owned(),
        ]))
        .send()
        .await
        .unwrap();

    assert_eq!(output.objects_deleted(), 3);
}
