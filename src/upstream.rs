//! Shared plumbing for calls to external services.
//!
//! Every adapter (payment gateway, Firestore, identity toolkit, storage
//! back ends) funnels its HTTP responses through [`read_json`] so that
//! status handling and error-message extraction behave the same way.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Longest raw body excerpt carried in an error message.
const MAX_BODY_EXCERPT: usize = 256;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("unexpected response from {service}: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("authentication with {service} failed: {message}")]
    Auth {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }

    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            service,
            message: message.into(),
        }
    }
}

/// Check the status and decode the body as `T`.
pub async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, UpstreamError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| UpstreamError::decode(service, e.to_string()))
}

/// Pull a human-readable message out of an upstream error body.
///
/// Recognised shapes:
/// - `{"error": {"description": "..."}}` (Razorpay)
/// - `{"error": {"message": "..."}}` (Google APIs, Cloudinary)
/// - `{"error": "..."}` / `{"message": "..."}`
/// - `{"error_description": "..."}` (OAuth token endpoint)
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/error/description"),
            value.pointer("/error/message"),
            value.get("error_description"),
            value.get("error"),
            value.get("message"),
            value.get("detail"),
        ];
        if let Some(msg) = candidates.into_iter().flatten().find_map(|v| v.as_str()) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_BODY_EXCERPT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_razorpay_error() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The amount must be atleast INR 1.00"}}"#;
        assert_eq!(
            extract_error_message(body),
            "The amount must be atleast INR 1.00"
        );
    }

    #[test]
    fn test_extract_google_error() {
        let body = r#"{"error":{"code":404,"message":"No document to update","status":"NOT_FOUND"}}"#;
        assert_eq!(extract_error_message(body), "No document to update");
    }

    #[test]
    fn test_extract_flat_error_and_oauth() {
        assert_eq!(extract_error_message(r#"{"error":"bad key"}"#), "bad key");
        assert_eq!(
            extract_error_message(r#"{"error":"invalid_grant","error_description":"Invalid JWT"}"#),
            "Invalid JWT"
        );
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract_error_message("  pub_key is invalid \n"), "pub_key is invalid");
        assert_eq!(extract_error_message(""), "empty response body");

        let long = "x".repeat(1000);
        assert_eq!(extract_error_message(&long).len(), MAX_BODY_EXCERPT);
    }

    #[test]
    fn test_is_not_found() {
        let err = UpstreamError::Status {
            service: "firestore",
            status: 404,
            message: "missing".to_string(),
        };
        assert!(err.is_not_found());

        let err = UpstreamError::decode("firestore", "bad json");
        assert!(!err.is_not_found());
    }
}
