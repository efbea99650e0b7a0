//! HTTP handlers for the Products API

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::UuidPath;
use std::sync::Arc;
use utoipa::OpenApi;

use domain_users::{Principal, UserRepository};

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ImageUpload, Product, ProductFilter, ProductOwner};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::storage::ImageStore;

/// OpenAPI documentation for the Products API
#[derive(OpenApi)]
#[openapi(
    paths(list_products, create_product, get_product, delete_product),
    components(schemas(Product, ProductOwner, CreateProduct, ProductFilter)),
    tags(
        (name = "Products", description = "Marketplace listing endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<P, U, S>(service: ProductService<P, U, S>) -> Router
where
    P: ProductRepository + 'static,
    U: UserRepository + 'static,
    S: ImageStore + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).delete(delete_product))
        .with_state(shared_service)
}

/// List products with an optional search filter
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "List of products", body = Vec<Product>),
        (status = 500, description = "Internal server error")
    )
)]
async fn list_products<P, U, S>(
    State(service): State<Arc<ProductService<P, U, S>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductResult<Json<Vec<Product>>>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    let products = service.list_products(filter).await?;
    Ok(Json(products))
}

/// Create a new product listing owned by the caller.
///
/// Accepts a multipart form: `title`, `description` and `price_cents` text
/// fields plus any number of `images` file parts.
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body(content = CreateProduct, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Product created successfully", body = Product),
        (status = 400, description = "Malformed form data"),
        (status = 401, description = "Caller is not authenticated"),
        (status = 500, description = "Internal server error")
    )
)]
async fn create_product<P, U, S>(
    State(service): State<Arc<ProductService<P, U, S>>>,
    principal: Principal,
    multipart: Multipart,
) -> ProductResult<impl IntoResponse>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    let (input, images) = parse_product_form(multipart).await?;
    let product = service.save_product(&principal, input, images).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, description = "Malformed product ID"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error")
    )
)]
async fn get_product<P, U, S>(
    State(service): State<Arc<ProductService<P, U, S>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<Product>>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted (or did not exist)"),
        (status = 400, description = "Malformed product ID"),
        (status = 500, description = "Internal server error")
    )
)]
async fn delete_product<P, U, S>(
    State(service): State<Arc<ProductService<P, U, S>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<impl IntoResponse>
where
    P: ProductRepository,
    U: UserRepository,
    S: ImageStore,
{
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Split a multipart form into the product DTO and its image payloads,
/// preserving the order of the file parts.
async fn parse_product_form(
    mut multipart: Multipart,
) -> ProductResult<(CreateProduct, Vec<ImageUpload>)> {
    let mut title = String::new();
    let mut description = String::new();
    let mut price_cents: i64 = 0;
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ProductError::Validation(e.to_string()))?
    {
        match field.name().unwrap_or_default() {
            "title" => {
                title = field
                    .text()
                    .await
                    .map_err(|e| ProductError::Validation(e.to_string()))?;
            }
            "description" => {
                description = field
                    .text()
                    .await
                    .map_err(|e| ProductError::Validation(e.to_string()))?;
            }
            "price_cents" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ProductError::Validation(e.to_string()))?;
                price_cents = raw.parse().map_err(|_| {
                    ProductError::Validation(format!("Invalid price_cents: {}", raw))
                })?;
            }
            "images" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ProductError::Validation(e.to_string()))?;
                images.push(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok((
        CreateProduct {
            title,
            description,
            price_cents,
        },
        images,
    ))
}
