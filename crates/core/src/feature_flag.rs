//! Feature flag defaults and state-change rules.
//!
//! Every change to a flag's `enabled` state goes through
//! `FeatureFlagRepo::set_enabled`, which records one history row per real
//! change. This module decides what a requested change amounts to.

use crate::choices::FeatureKey;

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// `changed_by` / `last_modified_by` value for the operator CLI.
pub const ACTOR_CLI: &str = "CLI";
/// Actor recorded when default flags are first created.
pub const ACTOR_SYSTEM_INIT: &str = "system_init";
/// Actor recorded when flags are restored to their defaults.
pub const ACTOR_SYSTEM_RESET: &str = "system_reset";

/// Default history reasons for CLI actions.
pub const REASON_ENABLED: &str = "Enabled via CLI";
pub const REASON_DISABLED: &str = "Disabled via CLI";
pub const REASON_TOGGLED: &str = "Toggled via CLI";
pub const REASON_DELETED: &str = "Flag deleted";
pub const REASON_RESET: &str = "Reset to default";

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Initial state and description for a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDefault {
    pub key: FeatureKey,
    pub enabled: bool,
    pub description: &'static str,
}

/// The shipped default for `key`.
pub fn default_for(key: FeatureKey) -> FlagDefault {
    let (enabled, description) = match key {
        FeatureKey::AdsEnabled => (
            false,
            "Enable Google AdSense ads throughout the application. Disable while waiting for Google approval.",
        ),
        FeatureKey::AmpAdsEnabled => (
            false,
            "Enable AMP ads on aircraft detail pages. Requires ads_enabled to also be true.",
        ),
        FeatureKey::AnalyticsEnabled => (
            true,
            "Enable Google Analytics tracking and user behavior analysis.",
        ),
        FeatureKey::BetaFeatures => (
            false,
            "Enable beta features for testing. Should be disabled in production.",
        ),
        FeatureKey::MaintenanceMode => (
            false,
            "Enable maintenance mode banner. Shows a maintenance notice to users.",
        ),
    };
    FlagDefault {
        key,
        enabled,
        description,
    }
}

/// Defaults for every known key, in key order.
pub fn defaults() -> Vec<FlagDefault> {
    FeatureKey::ALL.iter().copied().map(default_for).collect()
}

// ---------------------------------------------------------------------------
// State changes
// ---------------------------------------------------------------------------

/// What a requested state amounts to given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagChange {
    /// Already in the requested state: nothing is written.
    Unchanged,
    /// A real transition: one history row plus the flag update.
    Changed { previous: bool, new: bool },
}

pub fn plan_change(current: bool, requested: bool) -> FlagChange {
    if current == requested {
        FlagChange::Unchanged
    } else {
        FlagChange::Changed {
            previous: current,
            new: requested,
        }
    }
}

/// Display word for a state, as used in CLI output.
pub fn state_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_analytics_is_on_by_default() {
        let enabled: Vec<FeatureKey> = defaults()
            .into_iter()
            .filter(|d| d.enabled)
            .map(|d| d.key)
            .collect();
        assert_eq!(enabled, vec![FeatureKey::AnalyticsEnabled]);
        assert_eq!(defaults().len(), FeatureKey::ALL.len());
    }

    #[test]
    fn no_change_when_state_matches() {
        assert_eq!(plan_change(true, true), FlagChange::Unchanged);
        assert_eq!(plan_change(false, false), FlagChange::Unchanged);
    }

    #[test]
    fn change_records_previous_and_new() {
        assert_eq!(
            plan_change(false, true),
            FlagChange::Changed {
                previous: false,
                new: true
            }
        );
    }
}
