/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::borrow::Cow;
use std::fmt::Write as _;
use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use uuid::Uuid;

use crate::error::{self, Error};
use crate::types::DiskImageFormat;
use crate::{GIBIBYTE, MEBIBYTE};

/// Fixed size of each uploaded image part
pub(crate) const PART_SIZE_BYTES: u64 = 10 * MEBIBYTE;

/// File name of the manifest object within its key space
pub(crate) const MANIFEST_FILE_NAME: &str = "manifest.xml";

/// Version string of the import manifest document format
const IMPORT_MANIFEST_VERSION: &str = "2010-11-15";

const IMPORTER_NAME: &str = "ec2-import-manager";

/// Smallest boot volume the conversion service accepts for instance imports
pub(crate) const MIN_VOLUME_SIZE_GIB: u64 = 8;

/// Default validity window for the signed URLs embedded in a manifest
pub(crate) const DEFAULT_URL_EXPIRATION_DAYS: u64 = 30;

/// SigV4 request signing bounds presigned URL validity to one week. Longer
/// expirations are accepted as input and silently bounded here.
const MAX_PRESIGN_VALIDITY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// One contiguous chunk of the disk image, stored as an individual S3 object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    index: u64,
    key: String,
    start: u64,
    end: u64,
}

impl ImagePart {
    /// Zero-based index of the part within the image
    pub fn index(&self) -> u64 {
        self.index
    }

    /// The S3 key the part is stored under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Inclusive byte range of the image covered by this part
    pub fn byte_range(&self) -> (u64, u64) {
        (self.start, self.end)
    }

    /// Size of the part in bytes
    pub fn size_bytes(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Metadata describing how a disk image is split into S3-resident parts.
///
/// A manifest is computed once per upload job, uploaded as an XML document to
/// its own key, and never mutated afterwards. The part layout is a pure
/// function of the image size, so the same manifest key always describes the
/// same parts; resuming an interrupted upload re-derives the layout instead
/// of reading the document back.
#[derive(Debug, Clone)]
pub struct ImportManifest {
    key: String,
    format: DiskImageFormat,
    image_size: u64,
    volume_size_gib: u64,
    url_expiration: Duration,
    parts: Vec<ImagePart>,
}

impl ImportManifest {
    /// Plan a fresh manifest with a newly generated key space.
    pub(crate) fn plan(
        key_prefix: Option<&str>,
        format: DiskImageFormat,
        image_size: u64,
        volume_size_gib: u64,
        url_expiration: Duration,
    ) -> Self {
        let base = format!("{}{}/", normalize_key_prefix(key_prefix), Uuid::new_v4());
        let key = format!("{base}{MANIFEST_FILE_NAME}");
        let parts = part_layout(&base, image_size);
        Self {
            key,
            format,
            image_size,
            volume_size_gib,
            url_expiration,
            parts,
        }
    }

    /// Reconstruct the manifest for an existing key, re-deriving the part
    /// layout deterministically from the image size.
    pub(crate) fn for_existing_key(
        manifest_key: &str,
        format: DiskImageFormat,
        image_size: u64,
        volume_size_gib: u64,
        url_expiration: Duration,
    ) -> Result<Self, Error> {
        let base = manifest_key
            .strip_suffix(MANIFEST_FILE_NAME)
            .filter(|base| base.is_empty() || base.ends_with('/'))
            .ok_or_else(|| {
                error::invalid_input(format!(
                    "{manifest_key} is not an import manifest key (expected `<prefix>/{MANIFEST_FILE_NAME}`)"
                ))
            })?;

        let parts = part_layout(base, image_size);
        Ok(Self {
            key: manifest_key.to_owned(),
            format,
            image_size,
            volume_size_gib,
            url_expiration,
            parts,
        })
    }

    /// The key of the manifest object
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The image format recorded in the manifest
    pub fn format(&self) -> &DiskImageFormat {
        &self.format
    }

    /// Total size of the disk image in bytes
    pub fn image_size(&self) -> u64 {
        self.image_size
    }

    /// Size in GiB of the volume the image converts into
    pub fn volume_size_gib(&self) -> u64 {
        self.volume_size_gib
    }

    /// The image parts, addressed by index
    pub fn parts(&self) -> &[ImagePart] {
        &self.parts
    }

    /// The key prefix containing the manifest and every part.
    ///
    /// Deleting everything under this prefix removes the artifact set.
    pub fn key_space(&self) -> &str {
        self.key
            .strip_suffix(MANIFEST_FILE_NAME)
            .expect("manifest key ends with manifest file name")
    }

    /// Render the manifest as the import manifest XML document, presigning
    /// the part and self-destruct URLs.
    ///
    /// Presigning is local computation; no network calls are made here.
    pub(crate) async fn render_xml(
        &self,
        s3_client: &aws_sdk_s3::Client,
        bucket: &str,
    ) -> Result<String, Error> {
        let presigning = PresigningConfig::expires_in(presign_validity(self.url_expiration))
            .map_err(error::invalid_input)?;

        let self_destruct_url = s3_client
            .delete_object()
            .bucket(bucket)
            .key(&self.key)
            .presigned(presigning.clone())
            .await?
            .uri()
            .to_string();

        let mut xml = String::new();
        let w = &mut xml;
        write!(w, "<manifest>").expect("write to string");
        write!(w, "<version>{IMPORT_MANIFEST_VERSION}</version>").expect("write to string");
        write!(w, "<file-format>{}</file-format>", xml_escape(self.format.as_str()))
            .expect("write to string");
        write!(
            w,
            "<importer><name>{IMPORTER_NAME}</name><version>{}</version></importer>",
            env!("CARGO_PKG_VERSION")
        )
        .expect("write to string");
        write!(
            w,
            "<self-destruct-url>{}</self-destruct-url>",
            xml_escape(&self_destruct_url)
        )
        .expect("write to string");
        write!(w, "<import>").expect("write to string");
        write!(w, "<size>{}</size>", self.image_size).expect("write to string");
        write!(w, "<volume-size>{}</volume-size>", self.volume_size_gib).expect("write to string");
        write!(w, "<parts count=\"{}\">", self.parts.len()).expect("write to string");

        for part in &self.parts {
            let head_url = s3_client
                .head_object()
                .bucket(bucket)
                .key(part.key())
                .presigned(presigning.clone())
                .await?
                .uri()
                .to_string();
            let get_url = s3_client
                .get_object()
                .bucket(bucket)
                .key(part.key())
                .presigned(presigning.clone())
                .await?
                .uri()
                .to_string();
            let delete_url = s3_client
                .delete_object()
                .bucket(bucket)
                .key(part.key())
                .presigned(presigning.clone())
                .await?
                .uri()
                .to_string();

            write!(w, "<part index=\"{}\">", part.index()).expect("write to string");
            write!(
                w,
                "<byte-range start=\"{}\" end=\"{}\"/>",
                part.start, part.end
            )
            .expect("write to string");
            write!(w, "<key>{}</key>", xml_escape(part.key())).expect("write to string");
            write!(w, "<head-url>{}</head-url>", xml_escape(&head_url)).expect("write to string");
            write!(w, "<get-url>{}</get-url>", xml_escape(&get_url)).expect("write to string");
            write!(w, "<delete-url>{}</delete-url>", xml_escape(&delete_url))
                .expect("write to string");
            write!(w, "</part>").expect("write to string");
        }

        write!(w, "</parts></import></manifest>").expect("write to string");
        Ok(xml)
    }
}

/// Deterministic part layout for an image of `image_size` bytes.
fn part_layout(base: &str, image_size: u64) -> Vec<ImagePart> {
    let count = image_size.div_ceil(PART_SIZE_BYTES);
    (0..count)
        .map(|index| {
            let start = index * PART_SIZE_BYTES;
            let end = std::cmp::min(start + PART_SIZE_BYTES, image_size) - 1;
            ImagePart {
                index,
                key: format!("{base}parts/{index}"),
                start,
                end,
            }
        })
        .collect()
}

/// Normalize an optional key prefix so it either is empty or ends with `/`.
fn normalize_key_prefix(prefix: Option<&str>) -> Cow<'_, str> {
    match prefix {
        None | Some("") => Cow::Borrowed(""),
        Some(p) if p.ends_with('/') => Cow::Borrowed(p),
        Some(p) => Cow::Owned(format!("{p}/")),
    }
}

/// Volume size to use when the caller didn't specify one.
pub(crate) fn derived_volume_size_gib(image_size: u64) -> u64 {
    std::cmp::max(image_size.div_ceil(GIBIBYTE), MIN_VOLUME_SIZE_GIB)
}

pub(crate) fn presign_validity(requested: Duration) -> Duration {
    if requested > MAX_PRESIGN_VALIDITY {
        tracing::debug!(
            "requested URL expiration {}s exceeds the presigning maximum; bounding to {}s",
            requested.as_secs(),
            MAX_PRESIGN_VALIDITY.as_secs()
        );
        MAX_PRESIGN_VALIDITY
    } else {
        requested
    }
}

fn xml_escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiskImageFormat;
    use std::time::Duration;

    const EXPIRATION: Duration = Duration::from_secs(60 * 60);

    fn plan(prefix: Option<&str>, image_size: u64) -> ImportManifest {
        ImportManifest::plan(prefix, DiskImageFormat::Vmdk, image_size, 8, EXPIRATION)
    }

    #[test]
    fn test_manifest_key_shape() {
        let manifest = plan(None, MEBIBYTE);
        let key = manifest.key();
        assert!(key.ends_with("/manifest.xml"));
        let uuid_segment = key.strip_suffix("/manifest.xml").unwrap();
        assert!(Uuid::parse_str(uuid_segment).is_ok(), "got {uuid_segment}");
    }

    #[test]
    fn test_manifest_key_prefix_handling() {
        let manifest = plan(Some("images"), MEBIBYTE);
        assert!(manifest.key().starts_with("images/"));

        // trailing slash is not doubled
        let manifest = plan(Some("images/"), MEBIBYTE);
        assert!(manifest.key().starts_with("images/"));
        assert!(!manifest.key().contains("//"));

        // empty prefix behaves as no prefix
        let manifest = plan(Some(""), MEBIBYTE);
        assert!(!manifest.key().starts_with('/'));
    }

    #[test]
    fn test_each_plan_gets_a_unique_key_space() {
        let a = plan(None, MEBIBYTE);
        let b = plan(None, MEBIBYTE);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_part_layout_exact_multiple() {
        let manifest = plan(None, 2 * PART_SIZE_BYTES);
        let parts = manifest.parts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].byte_range(), (0, PART_SIZE_BYTES - 1));
        assert_eq!(parts[1].byte_range(), (PART_SIZE_BYTES, 2 * PART_SIZE_BYTES - 1));
        assert_eq!(
            parts.iter().map(ImagePart::size_bytes).sum::<u64>(),
            2 * PART_SIZE_BYTES
        );
    }

    #[test]
    fn test_part_layout_remainder() {
        let image_size = 2 * PART_SIZE_BYTES + 5;
        let manifest = plan(None, image_size);
        let parts = manifest.parts();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].byte_range(), (2 * PART_SIZE_BYTES, image_size - 1));
        assert_eq!(parts[2].size_bytes(), 5);
    }

    #[test]
    fn test_part_layout_single_small_part() {
        let manifest = plan(None, 42);
        let parts = manifest.parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].byte_range(), (0, 41));
    }

    #[test]
    fn test_part_keys_live_under_the_key_space() {
        let manifest = plan(Some("pre"), 3 * PART_SIZE_BYTES);
        for part in manifest.parts() {
            assert!(part.key().starts_with(manifest.key_space()), "{}", part.key());
            assert!(part.key().contains("/parts/"));
        }
    }

    #[test]
    fn test_layout_is_deterministic_for_existing_key() {
        let original = plan(Some("images"), 5 * PART_SIZE_BYTES + 123);
        let rebuilt = ImportManifest::for_existing_key(
            original.key(),
            DiskImageFormat::Vmdk,
            original.image_size(),
            8,
            EXPIRATION,
        )
        .unwrap();
        assert_eq!(original.parts(), rebuilt.parts());
        assert_eq!(original.key_space(), rebuilt.key_space());
    }

    #[test]
    fn test_for_existing_key_rejects_non_manifest_keys() {
        let err = ImportManifest::for_existing_key(
            "images/not-a-manifest.txt",
            DiskImageFormat::Raw,
            MEBIBYTE,
            8,
            EXPIRATION,
        )
        .unwrap_err();
        assert_eq!(err.kind(), &crate::error::ErrorKind::InputInvalid);
    }

    #[test]
    fn test_derived_volume_size() {
        assert_eq!(derived_volume_size_gib(1), MIN_VOLUME_SIZE_GIB);
        assert_eq!(derived_volume_size_gib(8 * GIBIBYTE), 8);
        assert_eq!(derived_volume_size_gib(20 * GIBIBYTE), 20);
        assert_eq!(derived_volume_size_gib(20 * GIBIBYTE + 1), 21);
    }

    #[test]
    fn test_presign_validity_is_bounded() {
        let month = Duration::from_secs(30 * 24 * 60 * 60);
        assert_eq!(presign_validity(month), MAX_PRESIGN_VALIDITY);
        let hour = Duration::from_secs(3600);
        assert_eq!(presign_validity(hour), hour);
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("plain/key"), "plain/key");
        assert_eq!(
            xml_escape("a&b<c>\"d\'"),
            "a&amp;b&lt;c&gt;&quot;d&apos;"
        );
    }
}
