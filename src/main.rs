//! Internship Registry - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use internship_registry::api;
use internship_registry::config::Config;
use internship_registry::db::{DbPool, migrations};
use internship_registry::middleware::RequestLogger;
use internship_registry::services::FileStore;
use internship_registry::views::Views;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

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
            error!("  - In production, DATABASE_URL and REG_DATA_DIR must be set");
            error!("  - REG_PRINT_ROLL_START must not exceed REG_PRINT_ROLL_END");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Internship Registry");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for DATABASE_URL and REG_DATA_DIR");
    }

    // Create upload directories
    let store = FileStore::new(config.data_dir.clone(), config.allowed_extensions.clone());
    store
        .ensure_dirs()
        .await
        .expect("Failed to create upload directories");

    // Initialize database
    let pool = DbPool::new(&config).expect("Failed to initialize database");
    info!("Database connection established");

    // Run migrations
    migrations::run_migrations(&pool).expect("Failed to run migrations");
    info!("Database migrations complete");

    // Build the template environment once
    let views = web::Data::new(Views::new());

    info!(
        "Printable roster range: rolls {}-{}",
        config.print_roll_start, config.print_roll_end
    );

    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let app_config = web::Data::new(config);

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            // Add request logging middleware
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(views.clone())
            .app_data(app_config.clone())
            // Configure routes
            .configure(api::configure_page_routes)
            .configure(api::configure_internship_routes)
            .configure(api::configure_diary_routes)
            .configure(api::configure_certificate_routes)
            .configure(api::configure_file_routes)
            .configure(api::configure_printable_routes)
    });

    server.workers(worker_count).bind(&bind_address)?.run().await
}
