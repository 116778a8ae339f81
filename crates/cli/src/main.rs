//! `mosaic` -- operator CLI for the aircraft catalog.
//!
//! Manages feature flags, reviews user-submitted corrections, loads the
//! curated seed dataset, and mints API access tokens.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::corrections::ReviewArgs;
use commands::feature_flag::FeatureFlagCommand;
use commands::seed::SeedArgs;
use commands::token::IssueTokenArgs;

#[derive(Debug, Parser)]
#[command(name = "mosaic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect and change feature flags
    #[command(subcommand)]
    FeatureFlag(FeatureFlagCommand),

    /// List and review user-submitted corrections
    ReviewCorrections(ReviewArgs),

    /// Load the curated aircraft dataset
    Seed(SeedArgs),

    /// Fill in missing cruise speeds from the curated table
    UpdateCruiseSpeeds,

    /// Mint an API access token
    IssueToken(IssueTokenArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mosaic_db=warn,mosaic_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::FeatureFlag(cmd) => commands::feature_flag::run(&connect().await?, cmd).await,
        Command::ReviewCorrections(args) => {
            commands::corrections::run(&connect().await?, args).await
        }
        Command::Seed(args) => commands::seed::run(&connect().await?, args).await,
        Command::UpdateCruiseSpeeds => commands::seed::update_cruise_speeds(&connect().await?).await,
        Command::IssueToken(args) => commands::token::run(&args),
    }
}

/// Connect to `DATABASE_URL` and bring the schema up to date.
async fn connect() -> anyhow::Result<mosaic_db::DbPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = mosaic_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    mosaic_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use mosaic_core::roles::Role;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unknown_flag_keys_are_rejected_at_parse_time() {
        let result = Cli::try_parse_from(["mosaic", "feature-flag", "enable", "dark_mode"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["mosaic", "feature-flag", "enable", "beta_features"]);
        assert!(result.is_ok());
    }

    #[test]
    fn review_actions_are_mutually_exclusive() {
        let result =
            Cli::try_parse_from(["mosaic", "review-corrections", "--approve", "1", "--reject", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn seed_accepts_repeated_groups() {
        let cli = Cli::try_parse_from([
            "mosaic",
            "seed",
            "--group",
            "light-sport",
            "--group",
            "cessna-rg",
            "--atomic",
        ])
        .unwrap();
        match cli.command {
            Command::Seed(args) => {
                assert_eq!(args.group, vec!["light-sport", "cessna-rg"]);
                assert!(args.atomic);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn issue_token_defaults_to_editor_and_rejects_unknown_roles() {
        let cli = Cli::try_parse_from(["mosaic", "issue-token", "--username", "ops"]).unwrap();
        match cli.command {
            Command::IssueToken(args) => assert_eq!(args.role, Role::Editor),
            other => panic!("unexpected command: {other:?}"),
        }

        let result = Cli::try_parse_from([
            "mosaic",
            "issue-token",
            "--username",
            "ops",
            "--role",
            "viewer",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn issue_token_expiry_must_be_positive() {
        let result = Cli::try_parse_from([
            "mosaic",
            "issue-token",
            "--username",
            "ops",
            "--expiry-mins",
            "0",
        ]);
        assert!(result.is_err());
    }
}
