//! Moov onboarding CLI.
//!
//! Reads a profile exported as JSON, runs one onboarding operation against Moov and prints the
//! resulting JSON to stdout.
//!
//! ```text
//! MOOV_PUBLIC_KEY=... MOOV_SECRET_KEY=... \
//!     moov-onboard --config moov.toml create-account profile.json
//! ```

mod observability;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use moov_onboard::{
    AccountOnboarding, HttpMoovClient, MoovConfig, OnboardError, Result, profile::UserProfile,
};
use tracing::error;

use crate::observability::{LogFormat, init_observability};

#[derive(Debug, Parser)]
#[command(name = "moov-onboard", version, about = "Onboard profiles onto Moov")]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log line format on stderr.
    #[arg(
        long,
        value_enum,
        env = "LOG_FORMAT",
        ignore_case = true,
        default_value_t = LogFormat::Pretty
    )]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the Moov account for a profile.
    CreateAccount {
        /// Profile JSON file.
        profile: PathBuf,
    },
    /// Request the configured capabilities for a profile's existing account.
    RequestCapabilities {
        /// Profile JSON file; must contain `moov_account_id`.
        profile: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<MoovConfig> {
    match path {
        Some(path) => MoovConfig::from_file(path),
        None => {
            let config = MoovConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

fn load_profile(path: &Path) -> Result<UserProfile> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        OnboardError::InvalidInput(format!("cannot read profile {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        OnboardError::InvalidInput(format!("invalid profile {}: {e}", path.display()))
    })
}

async fn run(cli: Cli) -> Result<serde_json::Value> {
    let config = load_config(cli.config.as_deref())?;
    let client = HttpMoovClient::with_config(&config)?;
    let onboarding = AccountOnboarding::with_settings(client, config.onboarding);

    match cli.command {
        Command::CreateAccount { profile } => {
            let account = onboarding.create_account(&load_profile(&profile)?).await?;
            serde_json::to_value(account)
                .map_err(|e| OnboardError::SerializationError(e.to_string()))
        }
        Command::RequestCapabilities { profile } => {
            onboarding.request_capabilities(&load_profile(&profile)?).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_observability(cli.log_format);

    match run(cli).await {
        Ok(output) => {
            println!("{output:#}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "onboarding failed");
            ExitCode::FAILURE
        }
    }
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
    fn test_parse_create_account() {
        let cli =
            Cli::parse_from(["moov-onboard", "--config", "moov.toml", "create-account", "p.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("moov.toml")));
        assert!(matches!(
            cli.command,
            Command::CreateAccount { profile } if profile == Path::new("p.json")
        ));
    }

    #[test]
    fn test_parse_request_capabilities() {
        let cli = Cli::parse_from(["moov-onboard", "request-capabilities", "p.json"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Command::RequestCapabilities { .. }));
    }

    #[test]
    fn test_parse_log_format() {
        let cli = Cli::parse_from(["moov-onboard", "--log-format", "JSON", "create-account", "p"]);
        assert_eq!(cli.log_format, LogFormat::Json);

        let result =
            Cli::try_parse_from(["moov-onboard", "--log-format", "xml", "create-account", "p"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(load_config(None).is_ok());
    }

    #[test]
    fn test_missing_profile_file() {
        let result = load_profile(Path::new("/nonexistent/profile.json"));
        assert!(matches!(result, Err(OnboardError::InvalidInput(_))));
    }
}
