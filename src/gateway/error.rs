//! Route-boundary error type.
//!
//! Every module error converts into [`ApiError`], which renders as
//! `{"error": "..."}` with the status of its [`ErrorKind`].

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use utoipa::ToSchema;

use crate::catalog::CatalogError;
use crate::media::MediaError;
use crate::payment::PaymentError;
use crate::upstream::UpstreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing request fields
    InvalidRequest,
    /// Payment signature mismatch
    AuthenticityFailure,
    /// Absent resource
    NotFound,
    /// Any downstream SDK/API error
    UpstreamFailure,
}

impl ErrorKind {
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::AuthenticityFailure => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::AuthenticityFailure => "AUTHENTICITY_FAILURE",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamFailure => "UPSTREAM_FAILURE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Failed to fetch products: firestore returned 503: unavailable")]
    pub error: String,
}

/// Body of a rejected payment verification.
#[derive(Debug, Serialize)]
struct VerificationFailedBody {
    success: bool,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn authenticity_failure() -> Self {
        Self::new(
            ErrorKind::AuthenticityFailure,
            "Payment signature verification failed",
        )
    }

    /// Upstream failure with a route-specific prefix, e.g. `"Failed to fetch products"`.
    pub fn upstream(context: &str, err: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::UpstreamFailure, format!("{}: {}", context, err))
    }

    pub fn status(&self) -> StatusCode {
        self.kind.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.kind {
            ErrorKind::UpstreamFailure => {
                tracing::error!("[{}] {}", self.kind.name(), self.message)
            }
            _ => tracing::warn!("[{}] {}", self.kind.name(), self.message),
        }

        let status = self.status();
        if self.kind == ErrorKind::AuthenticityFailure {
            return (status, Json(VerificationFailedBody { success: false })).into_response();
        }
        (
            status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::MissingField(_)
            | PaymentError::InvalidAmount(_)
            | PaymentError::InvalidOrder(_) => Self::invalid_request(err.to_string()),
            PaymentError::SignatureMismatch => Self::authenticity_failure(),
            PaymentError::Upstream(_) => Self::new(ErrorKind::UpstreamFailure, err.to_string()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::not_found(err.to_string()),
            CatalogError::InvalidId(_)
            | CatalogError::NotAnObject
            | CatalogError::EmptyUpdate => Self::invalid_request(err.to_string()),
            CatalogError::Upstream(e) => Self::new(ErrorKind::UpstreamFailure, e.to_string()),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::MissingPart(_)
            | MediaError::UnsupportedFormat(_)
            | MediaError::Multipart(_) => Self::invalid_request(err.to_string()),
            MediaError::Upstream(_) => Self::new(ErrorKind::UpstreamFailure, err.to_string()),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        Self::new(ErrorKind::UpstreamFailure, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

/// `Json` extractor whose rejection renders as an [`ApiError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_http_status() {
        assert_eq!(
            ErrorKind::InvalidRequest.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorKind::AuthenticityFailure.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorKind::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorKind::UpstreamFailure.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::upstream("Failed to fetch users", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to fetch users: boom"})
        );
    }

    #[tokio::test]
    async fn test_authenticity_failure_body() {
        let response = ApiError::authenticity_failure().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": false})
        );
    }

    #[test]
    fn test_payment_error_mapping() {
        let err: ApiError = PaymentError::MissingField("razorpay_signature").into();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert!(err.message.contains("razorpay_signature"));

        let err: ApiError = PaymentError::SignatureMismatch.into();
        assert_eq!(err.kind, ErrorKind::AuthenticityFailure);

        let err: ApiError = PaymentError::Upstream(UpstreamError::decode("razorpay", "bad json")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.starts_with("Failed to create order: "));
    }

    #[test]
    fn test_catalog_error_mapping() {
        let err: ApiError = CatalogError::NotFound("abc".to_string()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CatalogError::NotAnObject.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err: ApiError = CatalogError::Upstream(UpstreamError::decode("firestore", "x")).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
