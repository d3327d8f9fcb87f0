use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::error::CatalogError;
use super::product::{Product, product_fields, update_fields, validate_product_id};
use crate::gateway::error::{ApiError, ApiJson, ApiResult, ErrorBody};
use crate::gateway::state::AppState;

/// Body of a successful delete.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Product with id abc123 deleted successfully.")]
    pub message: String,
}

/// Upstream failures get a route-specific prefix; everything else maps as usual.
fn with_context(context: &'static str) -> impl FnOnce(CatalogError) -> ApiError {
    move |err| match err {
        CatalogError::Upstream(e) => ApiError::upstream(context, e),
        other => other.into(),
    }
}

/// List all products
///
/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Array of {id, ...fields}", content_type = "application/json"),
        (status = 500, description = "Document store error", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .catalog
        .list()
        .await
        .map_err(with_context("Failed to fetch products"))?;
    Ok(Json(products))
}

/// Fetch one product
///
/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product document id")),
    responses(
        (status = 200, description = "{id, ...fields}", content_type = "application/json"),
        (status = 404, description = "No such product", body = ErrorBody),
        (status = 500, description = "Document store error", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = validate_product_id(&id)?;
    let product = state
        .catalog
        .get(id)
        .await
        .map_err(with_context("Failed to fetch product"))?;
    Ok(Json(product))
}

/// Add a product
///
/// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = Value, description = "Product fields", content_type = "application/json"),
    responses(
        (status = 201, description = "{id, ...fields}", content_type = "application/json"),
        (status = 400, description = "Body is not a JSON object", body = ErrorBody),
        (status = 500, description = "Document store error", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let fields = product_fields(body)?;
    let product = state
        .catalog
        .create(fields)
        .await
        .map_err(with_context("Failed to add product"))?;

    tracing::info!("[catalog] Added product {}", product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
///
/// PUT /api/products/{id}
///
/// Supplied top-level fields are merged into the stored document. The
/// response echoes the id and the supplied fields only.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product document id")),
    request_body(content = Value, description = "Fields to change", content_type = "application/json"),
    responses(
        (status = 200, description = "{id, ...suppliedFields}", content_type = "application/json"),
        (status = 400, description = "Invalid id or body", body = ErrorBody),
        (status = 404, description = "No such product", body = ErrorBody),
        (status = 500, description = "Document store error", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Product>> {
    let id = validate_product_id(&id)?;
    let fields = update_fields(body)?;
    let product = state
        .catalog
        .update(id, fields)
        .await
        .map_err(with_context("Failed to update product"))?;

    tracing::info!("[catalog] Updated product {}", id);
    Ok(Json(product))
}

/// Delete a product
///
/// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product document id")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteResponse),
        (status = 404, description = "No such product", body = ErrorBody),
        (status = 500, description = "Document store error", body = ErrorBody)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let id = validate_product_id(&id)?;
    state
        .catalog
        .delete(id)
        .await
        .map_err(with_context("Failed to delete product"))?;

    tracing::info!("[catalog] Deleted product {}", id);
    Ok(Json(DeleteResponse {
        message: format!("Product with id {} deleted successfully.", id),
    }))
}
