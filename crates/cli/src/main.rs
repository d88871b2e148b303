//! Vitrine CLI - Seeding and account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with starter categories and products
//! vitrine-cli seed
//!
//! # Create an operator account
//! vitrine-cli admin create -e ops@example.com -p 'a-strong-password'
//!
//! # Promote an existing client to operator
//! vitrine-cli admin promote -e client@example.com
//! ```
//!
//! All commands read the platform connection from the environment
//! (`PLATFORM_URL`, `PLATFORM_ANON_KEY`, `PLATFORM_SERVICE_KEY`).
//!
//! # Commands
//!
//! - `seed` - Insert starter catalog data
//! - `admin create` - Create operator accounts
//! - `admin promote` - Grant back-office access to an existing account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with starter data
    Seed,
    /// Manage operator accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new operator account
    Create {
        /// Operator email address
        #[arg(short, long)]
        email: String,

        /// Operator password
        #[arg(short, long)]
        password: String,

        /// Contact phone (optional)
        #[arg(long)]
        phone: Option<String>,
    },
    /// Promote an existing account to operator
    Promote {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                phone,
            } => {
                commands::admin::create(&email, &password, phone.as_deref()).await?;
            }
            AdminAction::Promote { email } => commands::admin::promote(&email).await?,
        },
    }
    Ok(())
}
