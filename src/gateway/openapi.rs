//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:10000/docs`
//! - OpenAPI JSON: `http://localhost:10000/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::catalog::handlers::DeleteResponse;
use crate::directory::DirectoryUser;
use crate::gateway::error::ErrorBody;
use crate::gateway::handlers::HealthResponse;
use crate::media::handlers::{
    FileUploadForm, FileUploadResponse, ImageUploadForm, ImageUploadResponse,
};
use crate::payment::{OrderRequest, VerifyRequest, VerifyResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront Gateway API",
        version = "1.0.0",
        description = "Product catalog, user directory, media uploads and Razorpay payments.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:10000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::payment::handlers::create_order,
        crate::payment::handlers::verify_payment,
        crate::catalog::handlers::list_products,
        crate::catalog::handlers::get_product,
        crate::catalog::handlers::create_product,
        crate::catalog::handlers::update_product,
        crate::catalog::handlers::delete_product,
        crate::directory::handlers::list_users,
        crate::media::handlers::upload_image,
        crate::media::handlers::upload_file,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            OrderRequest,
            VerifyRequest,
            VerifyResponse,
            DeleteResponse,
            DirectoryUser,
            ImageUploadForm,
            ImageUploadResponse,
            FileUploadForm,
            FileUploadResponse,
        )
    ),
    tags(
        (name = "Payments", description = "Razorpay order creation and payment verification"),
        (name = "Products", description = "Product catalog CRUD"),
        (name = "Users", description = "Identity provider user listing"),
        (name = "Media", description = "Image and file uploads"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
