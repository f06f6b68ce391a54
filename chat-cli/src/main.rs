//! # chat-cli
//!
//! CLI tool for exercising the chat-sync engine against a real or mock
//! backend.
//!
//! ## Commands
//!
//! - `init`: Store the backend profile (base URL + acting user)
//! - `history`: Fetch a conversation's latest or next older page
//! - `send`: Send a text, image or file message
//! - `recall`: Recall a message for every participant
//! - `delete`: Hide a message from your own view
//! - `forward`: Re-materialize a message in another conversation
//!
//! ## Example
//!
//! ```bash
//! # Store the profile
//! chat-cli init --api-base https://api.example --user u1 --name "Alice"
//!
//! # Latest page of a conversation
//! chat-cli history c1
//!
//! # Next older page, offset by what is already loaded
//! chat-cli history c1 --offset 10
//!
//! # Send a message
//! chat-cli send c1 "hello there"
//!
//! # Try everything against a fabricated backend
//! chat-cli --mock history c1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;

use commands::{delete, forward, history, init, recall, send};

/// CLI tool for exercising the chat-sync engine.
#[derive(Parser, Debug)]
#[command(name = "chat-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the stored profile
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use a mock backend with fabricated responses (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the backend profile used by all other commands
    Init {
        /// Backend base URL
        #[arg(long)]
        api_base: String,

        /// Acting user id
        #[arg(long)]
        user: String,

        /// Display name (defaults to the user id)
        #[arg(long, short)]
        name: Option<String>,
    },

    /// Fetch and print a page of a conversation's history
    History {
        /// Conversation id
        conversation: String,

        /// Number of messages already loaded; requests the next older page
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Send a message to a conversation
    Send {
        /// Conversation id
        conversation: String,

        /// Message text (or use --image / --file)
        text: Option<String>,

        /// Image files to upload as a single message
        #[arg(long, conflicts_with = "text")]
        image: Vec<PathBuf>,

        /// File to upload
        #[arg(long, conflicts_with_all = ["text", "image"])]
        file: Option<PathBuf>,
    },

    /// Recall a message for every participant
    Recall {
        /// Id of the message to recall
        message_id: String,
    },

    /// Hide a message from your own view (other participants keep it)
    Delete {
        /// Id of the message to hide
        message_id: String,
    },

    /// Forward a message to another conversation
    Forward {
        /// Id of the message to forward
        message_id: String,

        /// Conversation the message currently belongs to
        conversation: String,

        /// Target conversation id
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;

    match cli.command {
        Commands::Init {
            api_base,
            user,
            name,
        } => {
            init::run(&data_dir, &api_base, &user, name.as_deref()).await?;
        }
        Commands::History {
            conversation,
            offset,
        } => {
            history::run(&data_dir, &conversation, offset, cli.mock).await?;
        }
        Commands::Send {
            conversation,
            text,
            image,
            file,
        } => {
            send::run(&data_dir, &conversation, text, image, file, cli.mock).await?;
        }
        Commands::Recall { message_id } => {
            recall::run(&data_dir, &message_id, cli.mock).await?;
        }
        Commands::Delete { message_id } => {
            delete::run(&data_dir, &message_id, cli.mock).await?;
        }
        Commands::Forward {
            message_id,
            conversation,
            target,
        } => {
            forward::run(&data_dir, &message_id, &conversation, &target, cli.mock).await?;
        }
    }

    Ok(())
}

/// Get the default data directory for chat-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("io", "chatsync", "chat-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
