use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{DirectoryUser, UserDirectory};
use crate::config::DirectoryConfig;
use crate::google_auth::TokenSource;
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "identitytoolkit";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserInfo {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchGetResponse {
    #[serde(default)]
    users: Vec<UserInfo>,
}

/// Identity Toolkit `accounts:batchGet`. Returns the first page only.
pub struct FirebaseDirectory {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    url: String,
    max_results: u32,
}

impl FirebaseDirectory {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn TokenSource>,
        config: &DirectoryConfig,
        project_id: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            url: format!(
                "{}/projects/{}/accounts:batchGet",
                config.api_base.trim_end_matches('/'),
                project_id
            ),
            max_results: config.max_results,
        }
    }
}

#[async_trait]
impl UserDirectory for FirebaseDirectory {
    async fn list_users(&self) -> Result<Vec<DirectoryUser>, UpstreamError> {
        let token = self.tokens.access_token().await?;
        let response = self
            .http
            .get(&self.url)
            .bearer_auth(token)
            .query(&[("maxResults", self.max_results)])
            .send()
            .await?;
        let page: BatchGetResponse = read_json(SERVICE, response).await?;

        debug!("[directory] Fetched {} users", page.users.len());
        Ok(page
            .users
            .into_iter()
            .map(|u| DirectoryUser::new(u.local_id, u.email, u.display_name))
            .collect())
    }
}
