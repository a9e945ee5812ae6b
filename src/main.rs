use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use ollachat::chat::ChatController;
use ollachat::cli::{
    commands::{Cli, Commands},
    run_cli,
};
use ollachat::config::AppConfig;
use ollachat::db::open_store;
use ollachat::llm::ollama::OllamaClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

async fn index() -> impl Responder {
    let html = include_str!("../static/index.html");
    HttpResponse::Ok().content_type("text/html").body(html)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if cli.command != Commands::Serve {
        if let Err(e) = run_cli(cli.command, cli.config).await {
            error!("{}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    info!("Starting ollachat server...");

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store = match open_store(&config.storage) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    let client = Arc::new(OllamaClient::from_config(&config.llm));
    info!("Using model {} at {}", client.model(), config.llm.base_url);

    let controller = web::Data::new(ChatController::new(client, store));

    // Requests are accepted immediately; submissions wait until the restore lands.
    controller.clone().into_inner().restore_in_background();

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(controller.clone())
            .route("/", web::get().to(index))
            .route("/health", web::get().to(health))
            .configure(ollachat::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
