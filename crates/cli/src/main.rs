//! `ShopEasy` CLI - session store migration and backend checks.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table in PostgreSQL
//! shopeasy-cli migrate
//!
//! # Check that the REST backend answers
//! shopeasy-cli check-api
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopeasy-cli")]
#[command(author, version, about = "ShopEasy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storefront session table
    Migrate,
    /// Check that the REST backend is reachable
    CheckApi,
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::CheckApi => commands::api::check().await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_subcommands() {
        assert!(matches!(
            Cli::try_parse_from(["shopeasy-cli", "migrate"]).map(|cli| cli.command),
            Ok(Commands::Migrate)
        ));
        assert!(matches!(
            Cli::try_parse_from(["shopeasy-cli", "check-api"]).map(|cli| cli.command),
            Ok(Commands::CheckApi)
        ));
        assert!(Cli::try_parse_from(["shopeasy-cli", "seed"]).is_err());
    }
}
