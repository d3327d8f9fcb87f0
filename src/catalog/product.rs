//! Product documents as they travel through the gateway.
//!
//! A product is a schemaless JSON object. The document id is owned by the
//! store and is rendered next to the fields (`{id, ...fields}`), never
//! stored as one of them.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::CatalogError;

/// Top-level document fields.
pub type ProductFields = Map<String, Value>;

const ID_KEY: &str = "id";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    pub fn new(id: impl Into<String>, fields: ProductFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Validate a product id taken from a request path.
///
/// A `/` would address a sub-collection, `.` and `..` are reserved.
pub fn validate_product_id(id: &str) -> Result<&str, CatalogError> {
    if id.is_empty() || id.contains('/') || id == "." || id == ".." {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(id)
}

/// Fields of a create/update body. Any `id` key is dropped.
pub fn product_fields(body: Value) -> Result<ProductFields, CatalogError> {
    match body {
        Value::Object(mut map) => {
            map.remove(ID_KEY);
            Ok(map)
        }
        _ => Err(CatalogError::NotAnObject),
    }
}

/// Fields of a partial update. At least one field is required.
pub fn update_fields(body: Value) -> Result<ProductFields, CatalogError> {
    let fields = product_fields(body)?;
    if fields.is_empty() {
        return Err(CatalogError::EmptyUpdate);
    }
    Ok(fields)
}
