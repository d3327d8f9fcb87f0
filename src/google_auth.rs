//! Google service account OAuth2 tokens.
//!
//! Firestore and the Identity Toolkit API both accept an OAuth2 access
//! token minted from a service account key via the JWT bearer grant:
//!
//! ```text
//! sign RS256 JWT {iss, sub, aud=token_uri, scope, iat, exp}
//!   → POST token_uri (grant_type=jwt-bearer, assertion=<jwt>)
//!   → {access_token, expires_in}
//! ```
//!
//! One [`ServiceAccountTokenProvider`] is built at startup and shared by
//! every adapter that talks to Google APIs. Tokens are cached until
//! shortly before expiry.

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::ConfigError;
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "google-oauth";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of bearer tokens for Google APIs.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, UpstreamError>;
}

/// Fixed token, for emulators and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, UpstreamError> {
        Ok(self.0.clone())
    }
}

/// The fields of a service account key file that token minting needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|e| {
            ConfigError::Invalid(format!(
                "service account key {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    scope: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.refresh_at
    }
}

pub struct ServiceAccountTokenProvider {
    http: reqwest::Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    cache: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenProvider {
    pub fn new(
        http: reqwest::Client,
        key: ServiceAccountKey,
        scope: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            ConfigError::Invalid(format!("service account private key: {}", e))
        })?;
        Ok(Self {
            http,
            key,
            encoding_key,
            scope: scope.into(),
            cache: RwLock::new(None),
        })
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, UpstreamError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            sub: &self.key.client_email,
            aud: &self.key.token_uri,
            scope: &self.scope,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            UpstreamError::Auth {
                service: SERVICE,
                message: format!("failed to sign assertion: {}", e),
            }
        })
    }

    async fn fetch_token(&self, now: DateTime<Utc>) -> Result<CachedToken, UpstreamError> {
        let assertion = self.sign_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let token: TokenResponse = read_json(SERVICE, response).await.map_err(|e| match e {
            UpstreamError::Status { message, .. } => UpstreamError::Auth {
                service: SERVICE,
                message,
            },
            other => other,
        })?;

        tracing::debug!(
            "[google_auth] Minted access token for {} (expires in {}s)",
            self.key.client_email,
            token.expires_in
        );

        let lifetime = (token.expires_in - EXPIRY_MARGIN_SECS).max(0);
        Ok(CachedToken {
            value: token.access_token,
            refresh_at: now + Duration::seconds(lifetime),
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenProvider {
    async fn access_token(&self) -> Result<String, UpstreamError> {
        let now = Utc::now();
        if let Some(token) = self.cache.read().await.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let mut cache = self.cache.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cache.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let token = self.fetch_token(now).await?;
        let value = token.value.clone();
        *cache = Some(token);
        Ok(value)
    }
}
