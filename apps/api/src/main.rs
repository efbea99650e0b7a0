use axum::{middleware, Router};
use axum_helpers::{health_router, shutdown_signal};
use core_config::tracing::{init_tracing, install_color_eyre};
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use domain_products::{InMemoryImageStore, InMemoryProductRepository, ProductService};
use domain_users::{AuthService, InMemoryUserRepository, UserService};

mod auth;
mod config;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let user_repository = InMemoryUserRepository::new();
    let user_service = UserService::new(user_repository.clone());
    let auth_service = AuthService::new(user_repository.clone());
    let product_service = ProductService::new(
        InMemoryProductRepository::new(),
        user_repository,
        InMemoryImageStore::new(),
    );

    let api = Router::new()
        .nest(
            "/auth",
            domain_users::handlers::auth_router(user_service.clone(), auth_service),
        )
        .nest("/users", domain_users::handlers::router(user_service))
        .nest("/products", domain_products::handlers::router(product_service));

    let app = Router::new()
        .nest("/api/v1", api)
        .merge(health_router(core_config::app_info!()))
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", domain_products::ApiDoc::openapi()),
        )
        .layer(middleware::from_fn(auth::principal_middleware))
        .layer(TraceLayer::new_for_http());

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Marketplace API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
