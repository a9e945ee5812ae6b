pub mod commands;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::chat::{render, ChatController, ChatError};
use crate::cli::commands::Commands;
use crate::config::AppConfig;
use crate::db::{open_store, StoreError};
use crate::llm::ollama::OllamaClient;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to open storage: {0}")]
    Store(#[from] StoreError),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Chat(#[from] ChatError),
}

pub fn build_controller(config: &AppConfig) -> Result<Arc<ChatController>, StoreError> {
    let store = open_store(&config.storage)?;
    let client = Arc::new(OllamaClient::from_config(&config.llm));
    Ok(Arc::new(ChatController::new(client, store)))
}

pub async fn run_cli(command: Commands, config_path: String) -> Result<(), CliError> {
    let config = AppConfig::load(&config_path)?;

    match command {
        Commands::Serve => {
            unreachable!("Serve command should be intercepted by main.rs to boot actix-web");
        }
        Commands::Chat => {
            let controller = build_controller(&config)?;
            run_repl(controller, &config).await
        }
        Commands::History => {
            let controller = build_controller(&config)?;
            controller.restore();
            let session = controller.session();
            if session.is_empty() {
                println!("No stored conversation.");
            } else {
                print!("{}", render::transcript(session.messages()));
            }
            Ok(())
        }
        Commands::Clear => {
            let controller = build_controller(&config)?;
            controller.clear()?;
            println!("Started a new chat.");
            Ok(())
        }
    }
}

async fn run_repl(controller: Arc<ChatController>, config: &AppConfig) -> Result<(), CliError> {
    controller.restore();

    println!("--- ollachat ---");
    println!("Model: {} at {}", config.llm.model, config.llm.base_url);
    println!("Type /clear for a new chat, /exit to quit.");
    println!("----------------");

    let history = controller.session();
    if !history.is_empty() {
        print!("{}", render::transcript(history.messages()));
    }

    let stdin = io::stdin();
    loop {
        print!("\nYou> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "" => continue,
            "/exit" | "/quit" => break,
            "/clear" => {
                controller.clear()?;
                println!("Started a new chat.");
                continue;
            }
            _ => {}
        }

        controller.set_draft(input.trim_end_matches(['\r', '\n']));

        print!("Assistant> {}", render::LOADING_INDICATOR);
        io::stdout().flush()?;

        let pending = controller.submit_draft();
        tokio::pin!(pending);
        let mut ticker = tokio::time::interval(Duration::from_millis(750));
        ticker.tick().await;

        let outcome = loop {
            tokio::select! {
                outcome = &mut pending => break outcome,
                _ = ticker.tick() => {
                    print!(".");
                    io::stdout().flush()?;
                }
            }
        };

        // Drop the loading indicator line before printing the reply.
        print!("\r\x1b[2K");
        match outcome {
            Ok(reply) => {
                println!("Assistant> {}", reply.content);
                if let Some(footer) = render::footer_for(&reply) {
                    println!("    {}", footer);
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    info!("Leaving chat");
    Ok(())
}
