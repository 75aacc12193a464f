use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;
use volcanic_site::config::Settings;
use volcanic_site::core::{FormValidator, ServiceAreaDirectory};
use volcanic_site::routes::{self, AppState};
use volcanic_site::services::{SimulatedTransport, SubmissionTransport, SubmitterRegistry};

fn init_logging(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

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
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&settings);

    info!("Starting Volcanic site service...");

    let directory = match ServiceAreaDirectory::new(settings.service_areas.clone()) {
        Ok(directory) => Arc::new(directory),
        Err(e) => {
            error!("Invalid service area table: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()));
        }
    };

    info!(
        "Service area directory loaded ({} areas, {} ZIP codes)",
        directory.len(),
        directory.all_valid_zips().len()
    );

    let transport: Arc<dyn SubmissionTransport> = Arc::new(SimulatedTransport::new(
        settings.submission.simulated_delay(),
        settings.submission.failure_rate,
    ));

    let sessions = Arc::new(SubmitterRegistry::new(
        FormValidator::new(directory.clone()),
        transport,
        &settings.submission,
    ));

    info!(
        "Submission configured (timeout: {}s, simulated delay: {}ms)",
        settings.submission.timeout_secs,
        settings.submission.simulated_delay_ms
    );

    let app_state = AppState::new(directory, sessions);

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
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
