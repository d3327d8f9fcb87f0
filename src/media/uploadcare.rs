//! Uploadcare direct upload (`POST {api_base}/base/`).

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use tracing::debug;

use super::{FileStore, MediaError, Upload};
use crate::config::UploadcareConfig;
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "uploadcare";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// UUID of the stored file
    file: String,
}

pub struct UploadcareStore {
    http: reqwest::Client,
    upload_url: String,
    public_key: String,
    store: String,
}

impl UploadcareStore {
    /// `public_key` is required configuration; there is no fallback key.
    pub fn new(
        http: reqwest::Client,
        config: &UploadcareConfig,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            upload_url: format!("{}/base/", config.api_base.trim_end_matches('/')),
            public_key: public_key.into(),
            store: config.store.clone(),
        }
    }
}

#[async_trait]
impl FileStore for UploadcareStore {
    async fn upload_file(&self, upload: Upload) -> Result<String, MediaError> {
        debug!(
            "[media] Uploading file {} ({} bytes) to Uploadcare",
            upload.file_name_or_default(),
            upload.bytes.len()
        );

        let form = Form::new()
            .text("UPLOADCARE_PUB_KEY", self.public_key.clone())
            .text("UPLOADCARE_STORE", self.store.clone())
            .part("file", upload.multipart_part().map_err(UpstreamError::from)?);

        let response = self
            .http
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(UpstreamError::from)?;
        let uploaded: UploadResponse = read_json(SERVICE, response).await?;
        Ok(uploaded.file)
    }
}
