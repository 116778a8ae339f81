//! `mosaic feature-flag ...`

use anyhow::Context;
use clap::{Args, Subcommand};
use mosaic_core::choices::FeatureKey;
use mosaic_core::feature_flag::{
    default_for, state_word, FlagChange, ACTOR_CLI, REASON_DELETED, REASON_DISABLED,
    REASON_ENABLED, REASON_TOGGLED,
};
use mosaic_db::models::feature_flag::FeatureFlag;
use mosaic_db::repositories::{FeatureFlagRepo, FlagUpdate, InitOutcome};
use mosaic_db::DbPool;

use super::confirm;

/// History rows printed by `show`.
const SHOW_HISTORY_LIMIT: i64 = 10;

#[derive(Debug, Subcommand)]
pub enum FeatureFlagCommand {
    /// List flags and their states
    List {
        /// Only enabled flags
        #[arg(long, conflicts_with = "disabled")]
        enabled: bool,
        /// Only disabled flags
        #[arg(long)]
        disabled: bool,
    },

    /// Show one flag with its recent history
    Show { key: FeatureKey },

    /// Enable a flag
    Enable(ChangeArgs),

    /// Disable a flag
    Disable(ChangeArgs),

    /// Flip a flag's state
    Toggle(ChangeArgs),

    /// Create a flag that does not exist yet
    Create {
        key: FeatureKey,
        /// Create in the enabled state
        #[arg(long)]
        enabled: bool,
        /// Description; defaults to the built-in one for the key
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a flag (history is kept)
    Delete {
        key: FeatureKey,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create the default flags
    Init {
        /// Restore existing flags to their default state and description
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Args)]
pub struct ChangeArgs {
    pub key: FeatureKey,
    /// Reason recorded in the flag history
    #[arg(long)]
    pub reason: Option<String>,
}

fn warn_missing(key: FeatureKey) {
    println!("⚠ Feature flag \"{key}\" does not exist");
}

fn print_flag(flag: &FeatureFlag) {
    let mark = if flag.enabled { "✓" } else { "✗" };
    println!(
        "{mark} {:<20} {:<9} {}",
        flag.feature_key.as_str(),
        state_word(flag.enabled),
        flag.feature_key.label()
    );
}

fn report_update(key: FeatureKey, update: Option<FlagUpdate>) {
    match update {
        None => warn_missing(key),
        Some(FlagUpdate {
            flag,
            change: FlagChange::Unchanged,
        }) => println!(
            "Feature flag \"{key}\" is already {}",
            state_word(flag.enabled)
        ),
        Some(FlagUpdate {
            change: FlagChange::Changed { previous, new },
            ..
        }) => println!(
            "✓ Feature flag \"{key}\" {} -> {}",
            state_word(previous),
            state_word(new)
        ),
    }
}

pub async fn run(pool: &DbPool, command: FeatureFlagCommand) -> anyhow::Result<()> {
    match command {
        FeatureFlagCommand::List { enabled, disabled } => {
            let state = match (enabled, disabled) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let flags = FeatureFlagRepo::list_by_state(pool, state).await?;
            if flags.is_empty() {
                println!("No feature flags found. Run `mosaic feature-flag init` to create the defaults.");
            }
            for flag in &flags {
                print_flag(flag);
            }
        }

        FeatureFlagCommand::Show { key } => {
            let Some(flag) = FeatureFlagRepo::find_by_key(pool, key).await? else {
                warn_missing(key);
                return Ok(());
            };
            print_flag(&flag);
            println!("  Description:      {}", flag.description);
            println!("  Last modified by: {}", flag.last_modified_by);
            println!("  Updated:          {}", flag.updated_at);

            let history = FeatureFlagRepo::history(pool, key, SHOW_HISTORY_LIMIT).await?;
            if !history.is_empty() {
                println!("  Recent changes:");
                for entry in history {
                    println!(
                        "    {} {} -> {} by {}{}",
                        entry.changed_at.format("%Y-%m-%d %H:%M:%S"),
                        state_word(entry.previous_state),
                        state_word(entry.new_state),
                        entry.changed_by,
                        if entry.reason.is_empty() {
                            String::new()
                        } else {
                            format!(" ({})", entry.reason)
                        }
                    );
                }
            }
        }

        FeatureFlagCommand::Enable(args) => {
            let reason = args.reason.as_deref().unwrap_or(REASON_ENABLED);
            let update = FeatureFlagRepo::set_enabled(pool, args.key, true, ACTOR_CLI, reason).await?;
            report_update(args.key, update);
        }

        FeatureFlagCommand::Disable(args) => {
            let reason = args.reason.as_deref().unwrap_or(REASON_DISABLED);
            let update =
                FeatureFlagRepo::set_enabled(pool, args.key, false, ACTOR_CLI, reason).await?;
            report_update(args.key, update);
        }

        FeatureFlagCommand::Toggle(args) => {
            let reason = args.reason.as_deref().unwrap_or(REASON_TOGGLED);
            let update = FeatureFlagRepo::toggle(pool, args.key, ACTOR_CLI, reason).await?;
            report_update(args.key, update);
        }

        FeatureFlagCommand::Create {
            key,
            enabled,
            description,
        } => {
            if FeatureFlagRepo::find_by_key(pool, key).await?.is_some() {
                println!("⚠ Feature flag \"{key}\" already exists");
                return Ok(());
            }
            let description = description.unwrap_or_else(|| default_for(key).description.to_string());
            let flag = FeatureFlagRepo::create(pool, key, enabled, &description, ACTOR_CLI)
                .await
                .with_context(|| format!("Failed to create feature flag \"{key}\""))?;
            println!("✓ Created feature flag \"{key}\"");
            print_flag(&flag);
        }

        FeatureFlagCommand::Delete { key, yes } => {
            if FeatureFlagRepo::find_by_key(pool, key).await?.is_none() {
                warn_missing(key);
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete feature flag \"{key}\"?"))? {
                println!("Cancelled");
                return Ok(());
            }
            if FeatureFlagRepo::delete(pool, key, ACTOR_CLI, REASON_DELETED).await? {
                println!("✓ Deleted feature flag \"{key}\"");
            } else {
                warn_missing(key);
            }
        }

        FeatureFlagCommand::Init { reset } => {
            let outcomes = FeatureFlagRepo::initialize(pool, reset).await?;
            for (key, outcome) in &outcomes {
                match outcome {
                    InitOutcome::Created => println!("✓ Created {key}"),
                    InitOutcome::Reset => println!("✓ Reset {key} to default"),
                    InitOutcome::Skipped => println!("- {key} already exists"),
                }
            }
            let created = outcomes
                .iter()
                .filter(|(_, o)| *o == InitOutcome::Created)
                .count();
            println!("{created} created, {} total", outcomes.len());
        }
    }

    Ok(())
}
