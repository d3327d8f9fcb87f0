//! In-memory catalog backend for local development and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;
use uuid::Uuid;

use super::error::CatalogError;
use super::product::{Product, ProductFields};
use super::store::CatalogStore;

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    docs: DashMap<String, ProductFields>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Firestore auto-ids are 20 alphanumerics; a simple v4 uuid is close enough.
    fn next_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self
            .docs
            .iter()
            .map(|entry| Product::new(entry.key().clone(), entry.value().clone()))
            .collect();
        // Firestore lists in document-id order
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        self.docs
            .get(id)
            .map(|doc| Product::new(id, doc.value().clone()))
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, CatalogError> {
        let id = Self::next_id();
        self.docs.insert(id.clone(), fields.clone());
        debug!("[catalog] memory insert {}", id);
        Ok(Product::new(id, fields))
    }

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Product, CatalogError> {
        match self.docs.entry(id.to_string()) {
            Entry::Occupied(mut doc) => {
                let doc = doc.get_mut();
                for (key, value) in &fields {
                    doc.insert(key.clone(), value.clone());
                }
                Ok(Product::new(id, fields))
            }
            Entry::Vacant(_) => Err(CatalogError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.docs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}
