//! Delius Community API server.
//!
//! Loads the profile's `.env`, builds the repositories for the configured
//! data store, wires the services and serves the routes with rate limiting,
//! CORS, access logging and path normalisation.

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use delius_community_api::caching::redis::RedisClient;
use delius_community_api::config::{
    DataStoreConfig, DataStoreKind, DeliusApiConfig, Environment, FeatureConfig, IntegrationContextConfig,
    JwtConfig, RateLimitConfig, ServerConfig,
};
use delius_community_api::core::{AppContext, Integrations, ServiceSettings};
use delius_community_api::db::Database;
use delius_community_api::repositories::in_memory::seed;
use delius_community_api::repositories::Repositories;
use delius_community_api::routes::configure_all_routes;
use delius_community_api::services::appointments::HttpDeliusApiClient;
use delius_community_api::services::auth::TokenService;
use delius_community_api::services::telemetry::LogTelemetryClient;
use delius_community_api::utils::display_terminal::print_startup_summary;

#[actix_web::main]
async fn main() -> io::Result<()> {
    load_env_file();
    init_logging();

    info!("Starting Delius Community API");

    let context = build_context().await?;

    start_http_server(context).await
}

async fn build_context() -> io::Result<AppContext> {
    let repositories = initialize_repositories().await?;

    let key = JwtConfig::verification_key().map_err(io::Error::other)?;
    let token_service = TokenService::new(&key).map_err(|e| io::Error::other(e.to_string()))?;

    let settings = ServiceSettings {
        features: FeatureConfig::from_env(),
        integration_contexts: IntegrationContextConfig::from_env(),
    };
    info!("Features: {:?}", settings.features);

    let integrations = Integrations {
        telemetry: Arc::new(LogTelemetryClient),
        delius_api: Arc::new(HttpDeliusApiClient::new(DeliusApiConfig::from_env())),
    };

    Ok(AppContext::build(&repositories, integrations, settings, Arc::new(token_service)))
}

/// Repositories for `DATA_STORE`.
///
/// # Errors
///
/// * MongoDB or Redis do not answer
/// * the seed data cannot be loaded into the in-memory store
async fn initialize_repositories() -> io::Result<Repositories> {
    match DataStoreConfig::kind() {
        DataStoreKind::Mongo => {
            info!("Connecting to MongoDB and Redis");

            let database = Database::new().await.map_err(|e| {
                error!("MongoDB connection failed: {}", e);
                io::Error::other(e.to_string())
            })?;
            let redis = RedisClient::new().await.map_err(|e| {
                error!("Redis connection failed: {}", e);
                io::Error::other(e.to_string())
            })?;

            Ok(Repositories::mongo(Arc::new(database), Arc::new(redis)))
        }
        DataStoreKind::Memory => {
            info!("Using the seeded in-memory store");

            let store = seed::seeded_store().map_err(|e| io::Error::other(e.to_string()))?;
            Ok(Repositories::in_memory(Arc::new(store)))
        }
    }
}

async fn start_http_server(context: AppContext) -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    let rate_limit = RateLimitConfig::load();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("invalid rate limit configuration"))?;
    info!(
        "Rate limiting: {} requests per second, burst {}",
        rate_limit.per_second, rate_limit.burst_size
    );

    print_startup_summary(
        &format!("{:?}", Environment::current()),
        &format!("{:?}", DataStoreConfig::kind()),
        &bind_address,
    );

    let context = web::Data::new(context);

    HttpServer::new(move || {
        App::new()
            .app_data(context.clone())
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// Loads `.env.prod` or `.env.dev` according to `PROFILE` (default `dev`),
/// otherwise `.env`.
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    let loaded = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod").map(|_| ()),
        "dev" => dotenv::from_filename(".env.dev").map(|_| ()),
        _ => dotenv().map(|_| ()),
    };

    // Logging is not up yet.
    if let Err(e) = loaded {
        eprintln!("No env file for profile {}: {}", profile, e);
    }
}

/// `RUST_LOG`, default `info,actix_web=info`.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

fn configure_cors() -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    let origins = std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());
    for origin in origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        cors = cors.allowed_origin(origin);
    }

    cors
}
