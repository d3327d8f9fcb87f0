//! Product catalog.
//!
//! - `product`: product documents and request-body validation
//! - `store`: the `CatalogStore` trait
//! - `firestore`: Firestore REST backend
//! - `memory`: in-memory backend (`catalog.backend: memory`)
//! - `value`: Firestore typed value codec
//! - `handlers`: `/api/products` routes

pub mod error;
pub mod firestore;
pub mod handlers;
pub mod memory;
pub mod product;
pub mod store;
pub mod value;

pub use error::CatalogError;
pub use firestore::FirestoreCatalog;
pub use memory::MemoryCatalog;
pub use product::{Product, ProductFields, product_fields, update_fields, validate_product_id};
pub use store::CatalogStore;
