/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::SeekFrom;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::task::JoinSet;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};

use crate::error::Error;
use crate::manifest::ImagePart;
use crate::operation::upload_image::context::UploadImageContext;

/// Request/input type for our "upload_part" service.
#[derive(Debug, Clone)]
pub(super) struct UploadPartRequest {
    pub(super) ctx: UploadImageContext,
    pub(super) part: ImagePart,
}

/// handler (service fn) for a single part
async fn upload_part_handler(request: UploadPartRequest) -> Result<(), Error> {
    let ctx = request.ctx;
    let part = request.part;

    let data = read_part_data(&ctx, &part).await?;
    ctx.s3_client()
        .put_object()
        .bucket(&ctx.state.bucket)
        .key(part.key())
        .content_length(part.size_bytes() as i64)
        .body(ByteStream::from(data))
        .send()
        .await?;

    tracing::trace!("completed upload of part {}", part.index());
    ctx.part_completed(part.index());
    Ok(())
}

/// Read the byte range for `part` out of the source image file.
///
/// Each part gets its own file handle so concurrent reads never contend on a
/// shared seek position.
async fn read_part_data(ctx: &UploadImageContext, part: &ImagePart) -> Result<Bytes, Error> {
    let mut file = tokio::fs::File::open(&ctx.state.source).await?;
    let (start, _) = part.byte_range();
    file.seek(SeekFrom::Start(start)).await?;

    let mut buf = vec![0u8; part.size_bytes() as usize];
    file.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}

/// Create a new tower::Service for uploading individual image parts to S3
pub(super) fn upload_part_service(
    ctx: &UploadImageContext,
) -> impl Service<UploadPartRequest, Response = (), Error = Error, Future: Send> + Clone + Send {
    let svc = service_fn(upload_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(ctx.state.concurrency)
        .service(svc)
}

/// Upload every part in `parts`, up to the job's concurrency limit at a time.
///
/// The first failure aborts all remaining work; the error returned is the
/// first one observed. Part completion order is unspecified.
pub(super) async fn upload_parts(
    ctx: UploadImageContext,
    parts: Vec<ImagePart>,
) -> Result<(), Error> {
    let svc = upload_part_service(&ctx);
    let mut tasks = JoinSet::new();

    for part in parts {
        let req = UploadPartRequest {
            ctx: ctx.clone(),
            part,
        };
        let svc = svc.clone();
        tasks.spawn(async move { svc.oneshot(req).await });
    }
    tracing::trace!("work distributed for uploading parts");

    let mut first_err: Option<Error> = None;
    while let Some(join_result) = tasks.join_next().await {
        let result = match join_result {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => continue,
            Err(join_err) => Err(join_err.into()),
        };

        if let Err(err) = result {
            if first_err.is_none() {
                tracing::error!("part upload failed, abandoning remaining part uploads");
                tasks.abort_all();
                first_err = Some(err);
            }
        }
    }

    match first_err {
        None => Ok(()),
        Some(err) => Err(err),
    }
}
