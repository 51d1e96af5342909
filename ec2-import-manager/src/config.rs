/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;

/// Load import manager config from the environment
pub mod loader;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    s3_client: aws_sdk_s3::client::Client,
    ec2_client: aws_sdk_ec2::client::Client,
    memo_dir: PathBuf,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The Amazon S3 client instance that will be used to store manifests and image parts.
    pub fn s3_client(&self) -> &aws_sdk_s3::Client {
        &self.s3_client
    }

    /// The Amazon EC2 client instance that will be used to submit and track conversion tasks.
    pub fn ec2_client(&self) -> &aws_sdk_ec2::Client {
        &self.ec2_client
    }

    /// The local directory resume memos are kept in.
    pub fn memo_dir(&self) -> &PathBuf {
        &self.memo_dir
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    s3_client: Option<aws_sdk_s3::Client>,
    ec2_client: Option<aws_sdk_ec2::Client>,
    memo_dir: Option<PathBuf>,
}

impl Builder {
    /// Set an explicit S3 client to use for manifest and part storage.
    pub fn s3_client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.s3_client = Some(client);
        self
    }

    /// Set an explicit EC2 client to use for conversion tasks.
    pub fn ec2_client(mut self, client: aws_sdk_ec2::Client) -> Self {
        self.ec2_client = Some(client);
        self
    }

    /// Override the directory resume memos are kept in.
    ///
    /// Defaults to an `ec2-import-manager/resume` subdirectory of the
    /// per-user local data directory.
    pub fn memo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.memo_dir = Some(dir.into());
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            s3_client: self.s3_client.expect("s3 client set"),
            ec2_client: self.ec2_client.expect("ec2 client set"),
            memo_dir: self.memo_dir.unwrap_or_else(default_memo_dir),
        }
    }
}

/// Per-user application data location for resume memos.
///
/// Falls back to the system temp directory when the platform has no
/// local-data directory; a memo there is still better than none.
fn default_memo_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ec2-import-manager")
        .join("resume")
}

#[cfg(test)]
mod tests {
    use super::default_memo_dir;

    #[test]
    fn test_default_memo_dir_is_namespaced() {
        let dir = default_memo_dir();
        assert!(dir.ends_with("ec2-import-manager/resume"));
    }
}
