mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageDriver};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::{
    routes as categories_routes, CategoryService, PgCategoryRepository,
};
use crate::features::products::{routes as products_routes, PgProductRepository, ProductService};
use crate::modules::storage::{BlobStorage, LocalDiskStorage, MinioStorage};
use crate::shared::constants::FLASH_TTL_SECS;
use crate::shared::flash::FlashStore;
use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let view_count = shared::views::init_views(&config.app.views_dir);
    tracing::info!(
        "Loaded {} views from {}",
        view_count,
        config.app.views_dir
    );

    // Image storage; the local driver is also served by this process
    let mut public_files = Router::new();
    let storage: Arc<dyn BlobStorage> = match config.storage.driver {
        StorageDriver::Local => {
            let local = &config.storage;
            if local.local_public_url.starts_with('/') {
                public_files = public_files
                    .nest_service(&local.local_public_url, ServeDir::new(&local.local_root));
            }
            tracing::info!(
                "Local storage at {} served under {}",
                local.local_root,
                local.local_public_url
            );
            Arc::new(LocalDiskStorage::new(
                &local.local_root,
                &local.local_public_url,
            ))
        }
        StorageDriver::Minio => Arc::new(
            MinioStorage::connect(config.storage.minio.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO storage: {}", e))?,
        ),
    };

    let flash_store = Arc::new(FlashStore::new(Duration::from_secs(FLASH_TTL_SECS)));

    let category_repository = Arc::new(PgCategoryRepository::new(pool.clone()));
    let product_repository = Arc::new(PgProductRepository::new(pool.clone()));

    let category_service = Arc::new(CategoryService::new(category_repository.clone()));
    let product_service = Arc::new(ProductService::new(
        product_repository,
        category_repository,
        storage,
    ));
    tracing::info!("Catalog services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    let dashboard = products_routes::dashboard_routes(Arc::clone(&product_service), flash_store)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size));

    // Dashboard and Swagger UI share the optional basic auth
    let (dashboard, swagger) = if let Some(credentials) = config.dashboard.credentials() {
        tracing::info!("Dashboard basic auth enabled");
        let credentials = Arc::new(credentials);
        (
            dashboard.layer(from_fn(middleware::basic_auth_middleware(
                Arc::clone(&credentials),
                "Catalog Dashboard",
            ))),
            swagger.layer(from_fn(middleware::basic_auth_middleware(
                credentials,
                "Catalog API Docs",
            ))),
        )
    } else {
        tracing::info!("Dashboard basic auth disabled (no credentials configured)");
        (dashboard, swagger)
    };

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public read-only API
    let api_routes = Router::new()
        .merge(products_routes::api_routes(product_service))
        .merge(categories_routes::routes(category_service));

    let app = Router::new()
        .merge(swagger)
        .merge(dashboard)
        .merge(api_routes)
        .merge(public_files)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(Duration::from_secs(60))
            .with_interval(Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Dashboard available at http://{}/products", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
