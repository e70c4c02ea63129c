use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use service_orders_api::config::{Config, LogFormat};
use service_orders_api::middleware::{ErrorLogger, RequestId};
use service_orders_api::modules::{
    self,
    authorization::{IdentityRepository, MySqlIdentityRepository, PermissionAuthorizer},
    service_orders::{MySqlServiceOrderRepository, ServiceOrderService},
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("service_orders_api={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting Service Orders API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    if config.database.run_migrations {
        config
            .database
            .migrate(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database migrations applied");
    }

    let identities: Arc<dyn IdentityRepository> =
        Arc::new(MySqlIdentityRepository::new(db_pool.clone()));
    let service = Arc::new(
        ServiceOrderService::new(
            Arc::new(MySqlServiceOrderRepository::new(db_pool.clone())),
            Arc::new(PermissionAuthorizer),
        )
        .with_settings(config.app.clone()),
    );

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let service = service.clone();
        let identities = identities.clone();

        App::new()
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(db_pool.clone()))
            .configure(move |cfg| modules::configure(cfg, service, identities))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server terminated with an error")
}
