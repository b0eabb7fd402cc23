use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use garden_backend::{
    background_task::start_storage_sweep,
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    repositories::sqlx_repo::SqlxProjectRepo,
    routes::configure_routes,
    settings::AppConfig,
    storage::fs::FsStore,
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database connection pool");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    std::fs::create_dir_all(&config.storage_root)
        .expect("Failed to create storage root directory");

    let app_state = web::Data::new(AppState::new(&config, pool.clone()));

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🌿 Starting Garden API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let worker_count = config.worker_count;
    let cors_config = config.clone();
    let server_state = app_state.clone();

    let server = HttpServer::new(move || {
        let origins = cors_config.cors_origins();
        let cors = if origins.iter().any(|o| o == "*") {
            Cors::permissive()
        } else {
            origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
                .allow_any_method()
                .allow_any_header()
                .max_age(3600)
        };

        App::new()
            .app_data(server_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(AuthMiddleware)
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(worker_count)
    .bind(server_addr)?
    .run();

    let sweep_store = FsStore::new(&config.storage_root, &config.public_base_url);
    tokio::spawn(start_storage_sweep(SqlxProjectRepo::new(pool), sweep_store));

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
