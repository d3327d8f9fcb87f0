use async_trait::async_trait;

use super::error::CatalogError;
use super::product::{Product, ProductFields};

/// CRUD over the products collection.
///
/// Ids passed in are already validated with
/// [`validate_product_id`](super::validate_product_id).
#[async_trait]
pub trait CatalogStore: Send + Sync {
    fn name(&self) -> &'static str;

    async fn list(&self) -> Result<Vec<Product>, CatalogError>;

    async fn get(&self, id: &str) -> Result<Product, CatalogError>;

    /// Insert a new document under a store-assigned id.
    async fn create(&self, fields: ProductFields) -> Result<Product, CatalogError>;

    /// Merge `fields` into an existing document. Returns `{id, ...fields}`
    /// as supplied, not the merged document.
    async fn update(&self, id: &str, fields: ProductFields) -> Result<Product, CatalogError>;

    async fn delete(&self, id: &str) -> Result<(), CatalogError>;
}
