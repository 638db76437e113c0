//! ReportHub server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use reporthub_lib::api::{self, ApiDoc};
use reporthub_lib::config::Config;
use reporthub_lib::db::DbPool;
use reporthub_lib::middleware::{REQUEST_ID_HEADER, RequestLogger};

/// Perform health check (for container HEALTHCHECK).
async fn health_check() -> bool {
    let Ok(config) = Config::from_env() else {
        return false;
    };
    match DbPool::new(&config).await {
        Ok(pool) => pool.ping().await.is_ok(),
        Err(_) => false,
    }
}

fn build_cors(is_development: bool, origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(3600);

    if is_development {
        cors = cors
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://127.0.0.1:3000");
    }

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Check for --health-check flag (used by container HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(if health_check().await { 0 } else { 1 });
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, RHUB_DATABASE_URL must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  ReportHub Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let pool = DbPool::new(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to initialize database: {}", e)))?;
    info!(
        max_connections = config.database.max_connections,
        "Database connection established"
    );

    pool.run_migrations()
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to run migrations: {}", e)))?;

    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let is_development = config.is_development();
    let cors_origins = config.cors_origins.clone();

    info!("Upload limit: {}MB per report", max_upload_size / 1024 / 1024);

    let worker_count = if is_development { 4 } else { num_cpus::get() };
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, worker_count
    );
    info!("API docs at http://{}/swagger-ui/", bind_address);

    let openapi = ApiDoc::openapi();

    HttpServer::new(move || {
        App::new()
            // CORS must wrap outermost
            .wrap(build_cors(is_development, &cors_origins))
            .wrap(RequestLogger)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(max_upload_size))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_run_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .workers(worker_count)
    .bind(&bind_address)?
    .run()
    .await
}
