use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use log::info;

mod clients;
mod config;
mod errors;
mod handlers;
mod routes;
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;
use std::sync::Arc;

use clients::{CompletionApi, CompletionClient, LedgerApi, LedgerClient};
use config::Config;
use routes::configure_routes;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 1. Parse command line arguments and setup logging
    let args = Args::parse();
    let log_level = match args.log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level.to_string())).init();
    // Load configuration
    let config = Config::load().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    info!("Starting Token GPT API...");

    // Initialize the outbound clients once; they are shared read-only by all requests
    let ledger: Arc<dyn LedgerApi> =
        Arc::new(LedgerClient::new(&config.chain).expect("Failed to initialize chain provider"));
    let completion: Arc<dyn CompletionApi> = Arc::new(
        CompletionClient::new(&config.completion).expect("Failed to initialize completion client"),
    );

    // Build bind address from config
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    info!("Server will be available at http://{}", bind_addr);

    HttpServer::new(move || {
        // Configure CORS from config
        let allowed_origins = config.cors.allowed_origins.clone();

        // Use allowed_origin_fn for more flexible origin matching
        let cors = Cors::default().allowed_origin_fn(move |origin, _req_head| {
            let origin_str = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            allowed_origins.iter().any(|allowed| origin_str == allowed)
        });

        // Convert string methods to HTTP methods
        let methods: Vec<actix_web::http::Method> = config
            .cors
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();

        let cors = cors
            .allowed_methods(methods)
            .allowed_headers(config.cors.allowed_headers.clone())
            .max_age(3600);

        let cors = if config.cors.supports_credentials {
            cors.supports_credentials()
        } else {
            cors
        };

        App::new()
            .app_data(web::Data::from(ledger.clone()))
            .app_data(web::Data::from(completion.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
