//! User directory backed by the Firebase identity provider.

pub mod firebase;
pub mod handlers;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::upstream::UpstreamError;

pub use firebase::FirebaseDirectory;

/// A user as exposed by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DirectoryUser {
    /// Provider uid
    #[schema(example = "kY3f9PqR2sT1uV0wXyZ")]
    pub id: String,
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    /// Display name, else the local part of the email
    #[schema(example = "asha")]
    pub name: String,
}

impl DirectoryUser {
    pub fn new(id: String, email: Option<String>, display_name: Option<String>) -> Self {
        let name = display_name
            .filter(|n| !n.is_empty())
            .or_else(|| {
                email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .map(str::to_string)
            })
            .unwrap_or_default();
        Self { id, email, name }
    }
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, UpstreamError>;
}
