use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ollachat", version, about = "Chat with a local Ollama model", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the browser chat page and its JSON API
    Serve,

    /// Chat interactively in the terminal
    Chat,

    /// Print the stored conversation
    History,

    /// Start a new chat, discarding the stored conversation
    Clear,
}
