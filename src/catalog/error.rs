use thiserror::Error;

use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product with id {0} not found")]
    NotFound(String),

    #[error("Invalid product id: {0}")]
    InvalidId(String),

    #[error("Product body must be a JSON object")]
    NotAnObject,

    #[error("At least one field must be updated")]
    EmptyUpdate,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
