/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::Builder;
use crate::Config;
use std::path::PathBuf;

/// Load import manager [`Config`] from the environment.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    memo_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Override the directory resume memos are kept in.
    pub fn memo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.memo_dir = Some(dir.into());
        self
    }

    /// Load the default configuration
    ///
    /// Credentials and region are resolved the way the AWS SDK resolves them
    /// (environment, profile, IMDS, ...). If fields have been overridden
    /// during builder construction, the override values will be used.
    pub async fn load(self) -> Config {
        let shared_config = aws_config::from_env().load().await;
        let s3_client = aws_sdk_s3::Client::new(&shared_config);
        let ec2_client = aws_sdk_ec2::Client::new(&shared_config);

        let mut builder = Builder::default().s3_client(s3_client).ec2_client(ec2_client);
        if let Some(memo_dir) = self.memo_dir {
            builder = builder.memo_dir(memo_dir);
        }
        builder.build()
    }
}
