use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cafe_finder::config::{LoggingSettings, Settings};
use cafe_finder::routes::{self, AppState};
use cafe_finder::services::{OverpassClient, PointStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `LOG_LEVEL` and `LOG_FORMAT` override the settings
fn init_logging(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting Cafe Finder service...");

    let store = PointStore::open(&settings.store.path).await.map_err(|e| {
        error!("Failed to open store {}: {}", settings.store.path, e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!("Store opened at {}", settings.store.path);

    let overpass = OverpassClient::new(&settings.overpass).map_err(|e| {
        error!("Failed to create Overpass client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    info!(
        "Overpass client initialized for {} ({} km around {}, {})",
        settings.overpass.city,
        settings.overpass.radius_km,
        settings.overpass.center_lat,
        settings.overpass.center_lon
    );

    let app_state = AppState {
        store: Arc::new(store),
        overpass: Arc::new(overpass),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
