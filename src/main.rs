#[cfg(feature = "server")]
use anyhow::Context;
#[cfg(feature = "server")]
use clap::Parser;
#[cfg(feature = "server")]
use reviewsense::config::{
    DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_STORAGE_TIMEOUT_MS,
};

/// Review service - stores reviews and tags them with a sentiment
#[cfg(feature = "server")]
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "REVIEWS_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "REVIEWS_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "REVIEWS_DATABASE", default_value = DEFAULT_DATABASE)]
    database: String,

    /// Milliseconds a storage operation may wait before failing
    #[arg(long, env = "REVIEWS_STORAGE_TIMEOUT_MS", default_value_t = DEFAULT_STORAGE_TIMEOUT_MS)]
    storage_timeout_ms: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "server")]
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    use actix_web::{web, App, HttpServer};
    use reviewsense::{api, Database, ReviewService, ServerConfig};
    use tracing_subscriber::EnvFilter;

    let args = Args::parse();
    let config = ServerConfig::new()
        .with_host(args.host)
        .with_port(args.port)
        .with_database(args.database)
        .with_storage_timeout_ms(args.storage_timeout_ms)
        .with_verbose(args.verbose);

    // RUST_LOG wins over --verbose when set
    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(config.verbose)
        .init();

    // Initialize the database
    let db = Database::with_timeout(&config.database, config.storage_timeout())
        .with_context(|| format!("Opening database '{}'", config.database))?;
    db.create_schema()
        .await
        .context("Creating review schema")?;
    tracing::info!("Schema ready in {}", config.database);

    let addr = config
        .socket_addr()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    let service = web::Data::new(ReviewService::new(db));

    tracing::info!("listening on http://{}", addr);
    HttpServer::new(move || App::new().app_data(service.clone()).configure(api::configure))
        .bind(addr)
        .with_context(|| format!("Binding {}", addr))?
        .run()
        .await
        .context("HTTP server failed")?;

    Ok(())
}

#[cfg(not(feature = "server"))]
pub fn main() {
    // the HTTP front end lives behind the `server` feature
    eprintln!("reviewsense was built without the `server` feature");
}
