//! Main entry point for the service listings backend server.
//! This crate wires configuration, storage, and authentication into the REST API.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use auth_services::jwt::JwtService;
use postgres::database::*;
use service_listings::{ListingService, PgStore};
use web_handlers::*;

mod config;

use config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting service listings server...");

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Create database connection pool
    let pool = match create_connection_pool(&config.database_url, config.max_connections).await {
        Ok(pool) => {
            log::info!("🗃️ Database pool created successfully");

            if let Err(e) = test_connection(&pool).await {
                log::error!("❌ Database connection test failed: {}", e);
            }
            pool
        }
        Err(e) => {
            log::error!("❌ Failed to create database pool: {}", e);
            return Err(e).context("could not connect to the database");
        }
    };

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("failed to apply database migrations")?;
    }

    let store = Arc::new(PgStore::new(pool));
    let listings = web::Data::new(ListingService::new(store.clone(), store));
    let jwt_service = web::Data::new(JwtService::new(&config.jwt_secret));

    log::info!(
        "🌐 Server will be available at: http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(listings.clone())
            .app_data(jwt_service.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(listings_health))
                    .configure(configure_service_routes),
            )
            .route("/health", web::get().to(liveness))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
