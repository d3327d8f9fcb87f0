//! Media intake: image uploads to Cloudinary, file uploads to Uploadcare.
//!
//! Both adapters are plain proxies. The multipart part is buffered (bounded
//! by `media.max_upload_bytes`) and re-posted to the storage back end.

pub mod cloudinary;
pub mod error;
pub mod handlers;
pub mod uploadcare;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::Multipart;

pub use cloudinary::CloudinaryStore;
pub use error::MediaError;
pub use uploadcare::UploadcareStore;

const DEFAULT_FILE_NAME: &str = "upload";

/// One buffered multipart file part.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn file_name_or_default(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
    }

    fn multipart_part(&self) -> Result<reqwest::multipart::Part, reqwest::Error> {
        let part = reqwest::multipart::Part::bytes(self.bytes.to_vec())
            .file_name(self.file_name_or_default().to_string());
        match &self.content_type {
            Some(ct) => part.mime_str(ct),
            None => Ok(part),
        }
    }
}

/// Image storage. Returns the public URL of the stored image.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload_image(&self, upload: Upload) -> Result<String, MediaError>;
}

/// Generic file storage. Returns the stored file's UUID.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload_file(&self, upload: Upload) -> Result<String, MediaError>;
}

/// Take the first part named `field`. Other parts are skipped.
/// An empty part counts as absent.
pub async fn read_upload(
    multipart: &mut Multipart,
    field: &str,
) -> Result<Option<Upload>, MediaError> {
    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| MediaError::Multipart(e.body_text()))?
    {
        if part.name() != Some(field) {
            continue;
        }

        let file_name = part.file_name().map(str::to_string);
        let content_type = part.content_type().map(str::to_string);
        let bytes = part
            .bytes()
            .await
            .map_err(|e| MediaError::Multipart(e.body_text()))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Upload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}
