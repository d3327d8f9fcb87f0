//! Cloudinary signed image upload.
//!
//! `POST {api_base}/{cloud_name}/image/upload` with the signed parameters
//! `allowed_formats`, `folder` and `timestamp`. The signature is
//! `hex(SHA-256("k1=v1&k2=v2..." + api_secret))` over those parameters sorted
//! by name; the account must accept SHA-256 signatures.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{ImageStore, MediaError, Upload};
use crate::config::{CloudinaryConfig, Secret};
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "cloudinary";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

pub struct CloudinaryStore {
    http: reqwest::Client,
    upload_url: String,
    api_key: String,
    api_secret: Secret,
    folder: String,
    allowed_formats: Vec<String>,
}

impl CloudinaryStore {
    pub fn new(
        http: reqwest::Client,
        config: &CloudinaryConfig,
        cloud_name: &str,
        api_key: impl Into<String>,
        api_secret: Secret,
    ) -> Self {
        Self {
            http,
            upload_url: format!(
                "{}/{}/image/upload",
                config.api_base.trim_end_matches('/'),
                cloud_name
            ),
            api_key: api_key.into(),
            api_secret,
            folder: config.folder.clone(),
            allowed_formats: config
                .allowed_formats
                .iter()
                .map(|f| f.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Parameters covered by the signature, sorted by name.
    fn signed_params(&self, timestamp: i64) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("allowed_formats", self.allowed_formats.join(",")),
            ("folder", self.folder.clone()),
            ("timestamp", timestamp.to_string()),
        ])
    }

    fn sign(&self, params: &BTreeMap<&'static str, String>) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.expose().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Format of the upload by file extension, else by `image/*` content type.
    fn check_format(&self, upload: &Upload) -> Result<(), MediaError> {
        let from_name = upload
            .file_name
            .as_deref()
            .and_then(|n| n.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        let from_type = upload
            .content_type
            .as_deref()
            .and_then(|ct| ct.strip_prefix("image/"))
            .map(|sub| sub.to_ascii_lowercase());

        let format = from_name.or(from_type).unwrap_or_default();
        if self.allowed_formats.iter().any(|f| *f == format) {
            Ok(())
        } else {
            Err(MediaError::UnsupportedFormat(format!(
                "{} (allowed: {})",
                if format.is_empty() { "unknown" } else { &format },
                self.allowed_formats.join(", ")
            )))
        }
    }

    async fn upload_at(&self, upload: Upload, timestamp: i64) -> Result<String, MediaError> {
        self.check_format(&upload)?;

        let params = self.signed_params(timestamp);
        let signature = self.sign(&params);

        let mut form = Form::new()
            .part("file", upload.multipart_part().map_err(UpstreamError::from)?)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        debug!(
            "[media] Uploading image {} ({} bytes) to Cloudinary",
            upload.file_name_or_default(),
            upload.bytes.len()
        );
        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(UpstreamError::from)?;
        let uploaded: UploadResponse = read_json(SERVICE, response).await?;
        Ok(uploaded.secure_url)
    }
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn upload_image(&self, upload: Upload) -> Result<String, MediaError> {
        self.upload_at(upload, chrono::Utc::now().timestamp()).await
    }
}
