/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of import errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues
    InputInvalid,

    /// I/O errors
    IOError,

    /// Some kind of internal runtime issue (e.g. task failure, poisoned mutex, etc)
    RuntimeError,

    /// A call to the underlying cloud API failed
    ServiceError,

    /// Resume was requested but no memo exists for the image/bucket pair
    ResumeStateNotFound,

    /// A memo exists but could not be read
    ResumeStateUnavailable,

    /// One or more image parts failed to upload
    UploadFailed(UploadFailed),

    /// Artifact deletion was refused because the owning conversion task is still active
    ActiveConversionTask(ActiveConversionTask),

    /// Submitting the conversion request failed after a successful upload
    ConversionRequestFailed(ConversionRequestFailed),
}

/// Details about a failed image upload.
///
/// Carries everything the caller needs to either resume the upload or clean
/// up after it, so the presentation layer can format remediation text without
/// this crate baking guidance into error messages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UploadFailed {
    pub(crate) bucket: String,
    pub(crate) manifest_key: String,
    pub(crate) artifacts_retained: bool,
}

impl UploadFailed {
    /// The bucket the upload was targeting
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The key of the import manifest for the failed upload
    pub fn manifest_key(&self) -> &str {
        &self.manifest_key
    }

    /// Whether the manifest and any uploaded parts were left in place.
    ///
    /// When `true` the upload can be resumed; when `false` everything was
    /// rolled back and a fresh upload is required.
    pub fn artifacts_retained(&self) -> bool {
        self.artifacts_retained
    }
}

/// Details about a deletion refused due to an active conversion task.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveConversionTask {
    pub(crate) task_id: String,
}

impl ActiveConversionTask {
    /// The ID of the conversion task that is still active
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
}

/// Details about a failed conversion request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConversionRequestFailed {
    pub(crate) bucket: String,
    pub(crate) manifest_key: String,
}

impl ConversionRequestFailed {
    /// The bucket holding the uploaded manifest and parts
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The manifest key that remains intact and can be resubmitted
    pub fn manifest_key(&self) -> &str {
        &self.manifest_key
    }
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::ServiceError => write!(f, "service call failed"),
            ErrorKind::ResumeStateNotFound => write!(f, "no resume state found"),
            ErrorKind::ResumeStateUnavailable => write!(f, "resume state unavailable"),
            ErrorKind::UploadFailed(detail) => write!(
                f,
                "image upload failed; manifest key {} ({})",
                detail.manifest_key,
                if detail.artifacts_retained {
                    "artifacts retained"
                } else {
                    "artifacts rolled back"
                }
            ),
            ErrorKind::ActiveConversionTask(detail) => {
                write!(f, "conversion task {} is still active", detail.task_id)
            }
            ErrorKind::ConversionRequestFailed(detail) => write!(
                f,
                "conversion request failed; manifest {}/{} remains intact",
                detail.bucket, detail.manifest_key
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error
where
    T: Send + Sync + 'static,
{
    fn from(value: std::sync::PoisonError<T>) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl From<aws_smithy_types::error::operation::BuildError> for Error {
    fn from(value: aws_smithy_types::error::operation::BuildError) -> Self {
        Self::new(ErrorKind::InputInvalid, value)
    }
}

impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        Error::new(ErrorKind::ServiceError, value)
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn service_error<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ServiceError, err)
}

pub(crate) fn resume_state_not_found(source_path: &std::path::Path, bucket: &str) -> Error {
    Error::new(
        ErrorKind::ResumeStateNotFound,
        format!(
            "no upload memo exists for image {:?} and bucket {bucket}; run a fresh (non-resume) upload",
            source_path
        ),
    )
}

pub(crate) fn resume_state_unavailable<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::ResumeStateUnavailable, err)
}

pub(crate) fn upload_failed<E>(
    bucket: impl Into<String>,
    manifest_key: impl Into<String>,
    artifacts_retained: bool,
    err: E,
) -> Error
where
    E: Into<BoxError>,
{
    Error::new(
        ErrorKind::UploadFailed(UploadFailed {
            bucket: bucket.into(),
            manifest_key: manifest_key.into(),
            artifacts_retained,
        }),
        err,
    )
}

pub(crate) fn active_conversion_task(task_id: impl Into<String>) -> Error {
    let task_id = task_id.into();
    Error::new(
        ErrorKind::ActiveConversionTask(ActiveConversionTask {
            task_id: task_id.clone(),
        }),
        format!("conversion task {task_id} has not completed or been cancelled"),
    )
}

pub(crate) fn conversion_request_failed<E>(
    bucket: impl Into<String>,
    manifest_key: impl Into<String>,
    err: E,
) -> Error
where
    E: Into<BoxError>,
{
    Error::new(
        ErrorKind::ConversionRequestFailed(ConversionRequestFailed {
            bucket: bucket.into(),
            manifest_key: manifest_key.into(),
        }),
        err,
    )
}
