//! Firestore REST backend.
//!
//! Documents live at
//! `{api_base}/projects/{project}/databases/{database}/documents/{collection}/{id}`.
//! Update and delete carry a `currentDocument.exists=true` precondition so a
//! missing document comes back as 404 instead of being created or ignored.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::CatalogError;
use super::product::{Product, ProductFields};
use super::store::CatalogStore;
use super::value::{FirestoreFields, decode_fields, encode_fields, field_path};
use crate::config::{CatalogConfig, ConfigError};
use crate::google_auth::TokenSource;
use crate::upstream::{UpstreamError, read_json};

const SERVICE: &str = "firestore";

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: FirestoreFields,
}

impl Document {
    fn into_product(self) -> Product {
        let id = self.name.rsplit('/').next().unwrap_or_default().to_string();
        Product::new(id, decode_fields(self.fields))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct DocumentBody<'a> {
    fields: &'a FirestoreFields,
}

pub struct FirestoreCatalog {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    collection_url: Url,
    page_size: u32,
}

impl FirestoreCatalog {
    pub fn new(
        http: reqwest::Client,
        tokens: Arc<dyn TokenSource>,
        config: &CatalogConfig,
        project_id: &str,
    ) -> Result<Self, ConfigError> {
        let raw = format!(
            "{}/projects/{}/databases/{}/documents/{}",
            config.api_base.trim_end_matches('/'),
            project_id,
            config.database,
            config.collection
        );
        let collection_url = Url::parse(&raw)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::Invalid(format!("firestore collection url: {}", raw)))?;

        Ok(Self {
            http,
            tokens,
            collection_url,
            page_size: config.page_size.max(1),
        })
    }

    fn document_url(&self, id: &str) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, UpstreamError> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }
}

/// Map a 404 for document `id` to `NotFound`.
fn not_found_as(id: &str) -> impl FnOnce(UpstreamError) -> CatalogError + '_ {
    move |err| {
        if err.is_not_found() {
            CatalogError::NotFound(id.to_string())
        } else {
            CatalogError::Upstream(err)
        }
    }
}

#[async_trait]
impl CatalogStore for FirestoreCatalog {
    fn name(&self) -> &'static str {
        SERVICE
    }

    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .request(Method::GET, self.collection_url.clone())
                .await?
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let response = req.send().await.map_err(UpstreamError::from)?;
            let page: ListDocumentsResponse = read_json(SERVICE, response).await?;
            products.extend(page.documents.into_iter().map(Document::into_product));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("[catalog] Listed {} products", products.len());
        Ok(products)
    }

    async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        let response = self
            .request(Method::GET, self.document_url(id))
            .await?
            .send()
            .await
            .map_err(UpstreamError::from)?;
        let doc: Document = read_json(SERVICE, response).await.map_err(not_found_as(id))?;
        Ok(doc.into_product())
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, CatalogError> {
        let encoded = encode_fields(&fields);
        let response = self
            .request(Method::POST, self.collection_url.clone())
            .await?
            .json(&DocumentBody { fields: &encoded })
            .send()
            .await
            .map_err(UpstreamError::from)?;
        let doc: Document = read_json(SERVICE, response).await?;
        let product = doc.into_product();
        debug!("[catalog] Created product {}", product.id);
        Ok(product)
    }

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Product, CatalogError> {
        let encoded = encode_fields(&fields);
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|name| ("updateMask.fieldPaths", field_path(name)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let response = self
            .request(Method::PATCH, self.document_url(id))
            .await?
            .query(&query)
            .json(&DocumentBody { fields: &encoded })
            .send()
            .await
            .map_err(UpstreamError::from)?;
        read_json::<IgnoredAny>(SERVICE, response)
            .await
            .map_err(not_found_as(id))?;

        Ok(Product::new(id, fields))
    }

    async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let response = self
            .request(Method::DELETE, self.document_url(id))
            .await?
            .query(&[("currentDocument.exists", "true")])
            .send()
            .await
            .map_err(UpstreamError::from)?;
        read_json::<IgnoredAny>(SERVICE, response)
            .await
            .map_err(not_found_as(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google_auth::StaticToken;
    use httpmock::prelude::*;
    use serde_json::{Value, json};

    const COLLECTION_PATH: &str = "/v1/projects/storefront-test/databases/(default)/documents/products";

    fn catalog(server: &MockServer, page_size: u32) -> FirestoreCatalog {
        let config = CatalogConfig {
            api_base: server.url("/v1"),
            page_size,
            ..CatalogConfig::default()
        };
        FirestoreCatalog::new(
            reqwest::Client::new(),
            Arc::new(StaticToken("test-token".to_string())),
            &config,
            "storefront-test",
        )
        .unwrap()
    }

    fn doc(id: &str, fields: Value) -> Value {
        json!({
            "name": format!("projects/storefront-test/databases/(default)/documents/products/{}", id),
            "fields": fields,
            "createTime": "2024-05-01T10:00:00.000000Z",
            "updateTime": "2024-05-01T10:00:00.000000Z"
        })
    }

    #[tokio::test]
    async fn test_list_follows_page_tokens() {
        let server = MockServer::start_async().await;
        // Registered first so the token-bearing request matches it
        let second = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(COLLECTION_PATH)
                    .query_param("pageToken", "next-1");
                then.status(200).json_body(json!({
                    "documents": [doc("c", json!({"name": {"stringValue": "Lehenga"}}))]
                }));
            })
            .await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(COLLECTION_PATH)
                    .query_param("pageSize", "2")
                    .header("authorization", "Bearer test-token");
                then.status(200).json_body(json!({
                    "documents": [
                        doc("a", json!({"name": {"stringValue": "Kurta"}, "price": {"integerValue": "899"}})),
                        doc("b", json!({"name": {"stringValue": "Saree"}}))
                    ],
                    "nextPageToken": "next-1"
                }));
            })
            .await;

        let products = catalog(&server, 2).list().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(
            serde_json::to_value(&products[0]).unwrap(),
            json!({"id": "a", "name": "Kurta", "price": 899})
        );
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(COLLECTION_PATH);
                then.status(200).json_body(json!({}));
            })
            .await;

        assert!(catalog(&server, 300).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_tolerates_non_finite_doubles() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(COLLECTION_PATH);
                then.status(200).json_body(json!({
                    "documents": [
                        doc("a", json!({"name": {"stringValue": "Kurta"}, "price": {"doubleValue": "NaN"}})),
                        doc("b", json!({"price": {"doubleValue": 499.5}}))
                    ]
                }));
            })
            .await;

        let products = catalog(&server, 300).list().await.unwrap();

        assert_eq!(
            serde_json::to_value(&products).unwrap(),
            json!([
                {"id": "a", "name": "Kurta", "price": null},
                {"id": "b", "price": 499.5}
            ])
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("{}/ghost", COLLECTION_PATH));
                then.status(404).json_body(json!({
                    "error": {"code": 404, "message": "Document not found", "status": "NOT_FOUND"}
                }));
            })
            .await;

        let err = catalog(&server, 300).get("ghost").await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_create_posts_typed_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(COLLECTION_PATH).json_body(json!({
                    "fields": {
                        "name": {"stringValue": "Kurta"},
                        "price": {"integerValue": "899"}
                    }
                }));
                then.status(200).json_body(doc(
                    "XyZ123",
                    json!({"name": {"stringValue": "Kurta"}, "price": {"integerValue": "899"}}),
                ));
            })
            .await;

        let fields = json!({"name": "Kurta", "price": 899});
        let product = catalog(&server, 300)
            .create(fields.as_object().unwrap().clone())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(product.id, "XyZ123");
        assert_eq!(Value::Object(product.fields), fields);
    }

    #[tokio::test]
    async fn test_update_sends_mask_and_precondition() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH)
                    .path(format!("{}/abc", COLLECTION_PATH))
                    .query_param("updateMask.fieldPaths", "price")
                    .query_param("currentDocument.exists", "true")
                    .json_body(json!({"fields": {"price": {"integerValue": "799"}}}));
                then.status(200).json_body(doc("abc", json!({"price": {"integerValue": "799"}})));
            })
            .await;

        let product = catalog(&server, 300)
            .update("abc", json!({"price": 799}).as_object().unwrap().clone())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({"id": "abc", "price": 799})
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::PATCH).path(format!("{}/ghost", COLLECTION_PATH));
                then.status(404).json_body(json!({
                    "error": {"code": 404, "message": "No document to update: ghost", "status": "NOT_FOUND"}
                }));
            })
            .await;

        let err = catalog(&server, 300)
            .update("ghost", json!({"price": 1}).as_object().unwrap().clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_and_upstream_failure() {
        let server = MockServer::start_async().await;
        let deleted = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path(format!("{}/abc", COLLECTION_PATH))
                    .query_param("currentDocument.exists", "true");
                then.status(200).json_body(json!({}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path(format!("{}/locked", COLLECTION_PATH));
                then.status(403).json_body(json!({
                    "error": {"code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED"}
                }));
            })
            .await;

        let catalog = catalog(&server, 300);
        catalog.delete("abc").await.unwrap();
        deleted.assert_async().await;

        match catalog.delete("locked").await.unwrap_err() {
            CatalogError::Upstream(UpstreamError::Status { status, message, .. }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Missing or insufficient permissions.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_document_url_escapes_id() {
        let server_url = "http://localhost:1/v1";
        let config = CatalogConfig {
            api_base: server_url.to_string(),
            ..CatalogConfig::default()
        };
        let catalog = FirestoreCatalog::new(
            reqwest::Client::new(),
            Arc::new(StaticToken(String::new())),
            &config,
            "p",
        )
        .unwrap();

        assert_eq!(
            catalog.document_url("a b?c").as_str(),
            "http://localhost:1/v1/projects/p/databases/(default)/documents/products/a%20b%3Fc"
        );
    }
}
