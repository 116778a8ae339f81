//! Repository for `feature_flags` and its append-only `feature_flag_history`.
//!
//! All state changes funnel through [`FeatureFlagRepo::set_enabled`] (or
//! [`FeatureFlagRepo::toggle`], which shares its path) so that every real
//! transition produces exactly one history row in the same transaction.

use mosaic_core::choices::FeatureKey;
use mosaic_core::feature_flag::{
    self, plan_change, FlagChange, ACTOR_SYSTEM_INIT, ACTOR_SYSTEM_RESET, REASON_RESET,
};
use sqlx::{PgConnection, PgPool};

use crate::models::feature_flag::{FeatureFlag, FeatureFlagHistory};

/// Column list for `feature_flags` queries.
const COLUMNS: &str = "\
    id, feature_key, enabled, description, last_modified_by, created_at, updated_at";

/// Column list for `feature_flag_history` queries.
const HISTORY_COLUMNS: &str = "\
    id, feature_flag_id, feature_key, previous_state, new_state, changed_by, \
    reason, changed_at";

/// Result of a state-change request that found its flag.
#[derive(Debug, Clone)]
pub struct FlagUpdate {
    /// The flag as it is after the request.
    pub flag: FeatureFlag,
    pub change: FlagChange,
}

/// What `initialize` did for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Reset,
    Skipped,
}

/// Provides flag lookups, audited state changes, and default initialization.
pub struct FeatureFlagRepo;

impl FeatureFlagRepo {
    /// Every flag, ordered by key.
    pub async fn list(pool: &PgPool) -> Result<Vec<FeatureFlag>, sqlx::Error> {
        Self::list_by_state(pool, None).await
    }

    /// Flags ordered by key, optionally only those in `enabled` state.
    pub async fn list_by_state(
        pool: &PgPool,
        enabled: Option<bool>,
    ) -> Result<Vec<FeatureFlag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feature_flags \
             WHERE ($1::BOOLEAN IS NULL OR enabled = $1) \
             ORDER BY feature_key"
        );
        sqlx::query_as::<_, FeatureFlag>(&query)
            .bind(enabled)
            .fetch_all(pool)
            .await
    }

    /// Find a flag by key.
    pub async fn find_by_key(
        pool: &PgPool,
        key: FeatureKey,
    ) -> Result<Option<FeatureFlag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feature_flags WHERE feature_key = $1");
        sqlx::query_as::<_, FeatureFlag>(&query)
            .bind(key.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Insert a new flag. Fails with a unique violation if the key exists.
    pub async fn create(
        pool: &PgPool,
        key: FeatureKey,
        enabled: bool,
        description: &str,
        created_by: &str,
    ) -> Result<FeatureFlag, sqlx::Error> {
        let query = format!(
            "INSERT INTO feature_flags (feature_key, enabled, description, last_modified_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let flag = sqlx::query_as::<_, FeatureFlag>(&query)
            .bind(key.as_str())
            .bind(enabled)
            .bind(description)
            .bind(created_by)
            .fetch_one(pool)
            .await?;

        tracing::info!(feature_key = %key, enabled, created_by, "Feature flag created");
        Ok(flag)
    }

    /// Set a flag to `enabled`, recording history when the state changes.
    ///
    /// Returns `None` if the flag does not exist. Requesting the current
    /// state writes nothing and reports [`FlagChange::Unchanged`].
    pub async fn set_enabled(
        pool: &PgPool,
        key: FeatureKey,
        enabled: bool,
        changed_by: &str,
        reason: &str,
    ) -> Result<Option<FlagUpdate>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let update = Self::transition(&mut *tx, key, |_| enabled, changed_by, reason).await?;
        tx.commit().await?;
        Ok(update)
    }

    /// Flip a flag's state, recording history.
    pub async fn toggle(
        pool: &PgPool,
        key: FeatureKey,
        changed_by: &str,
        reason: &str,
    ) -> Result<Option<FlagUpdate>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let update = Self::transition(&mut *tx, key, |current| !current, changed_by, reason).await?;
        tx.commit().await?;
        Ok(update)
    }

    /// Delete a flag, first recording a final `previous -> false` history row.
    ///
    /// The history rows survive with a `NULL` flag reference. Returns `false`
    /// if the flag does not exist.
    pub async fn delete(
        pool: &PgPool,
        key: FeatureKey,
        changed_by: &str,
        reason: &str,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(flag) = Self::lock(&mut *tx, key).await? else {
            return Ok(false);
        };

        Self::record(&mut *tx, &flag, false, changed_by, reason).await?;
        sqlx::query("DELETE FROM feature_flags WHERE id = $1")
            .bind(flag.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(feature_key = %key, changed_by, "Feature flag deleted");
        Ok(true)
    }

    /// History for `key`, newest first, at most `limit` rows.
    ///
    /// Rows recorded before the flag was deleted are still returned.
    pub async fn history(
        pool: &PgPool,
        key: FeatureKey,
        limit: i64,
    ) -> Result<Vec<FeatureFlagHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM feature_flag_history \
             WHERE feature_key = $1 \
             ORDER BY changed_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, FeatureFlagHistory>(&query)
            .bind(key.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Create any missing default flags. With `reset`, existing flags are
    /// restored to their default state and description instead of skipped.
    pub async fn initialize(
        pool: &PgPool,
        reset: bool,
    ) -> Result<Vec<(FeatureKey, InitOutcome)>, sqlx::Error> {
        let mut outcomes = Vec::new();

        for default in feature_flag::defaults() {
            let inserted = sqlx::query(
                "INSERT INTO feature_flags (feature_key, enabled, description, last_modified_by) \
                 VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (feature_key) DO NOTHING",
            )
            .bind(default.key.as_str())
            .bind(default.enabled)
            .bind(default.description)
            .bind(ACTOR_SYSTEM_INIT)
            .execute(pool)
            .await?
            .rows_affected()
                > 0;

            let outcome = if inserted {
                InitOutcome::Created
            } else if reset {
                let mut tx = pool.begin().await?;
                Self::transition(
                    &mut *tx,
                    default.key,
                    |_| default.enabled,
                    ACTOR_SYSTEM_RESET,
                    REASON_RESET,
                )
                .await?;
                sqlx::query(
                    "UPDATE feature_flags SET description = $2, last_modified_by = $3 \
                     WHERE feature_key = $1",
                )
                .bind(default.key.as_str())
                .bind(default.description)
                .bind(ACTOR_SYSTEM_RESET)
                .execute(&mut *tx)
                .await?;
                tx.commit().await?;
                InitOutcome::Reset
            } else {
                InitOutcome::Skipped
            };

            tracing::info!(feature_key = %default.key, ?outcome, "Feature flag initialized");
            outcomes.push((default.key, outcome));
        }

        Ok(outcomes)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    async fn lock(
        conn: &mut PgConnection,
        key: FeatureKey,
    ) -> Result<Option<FeatureFlag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM feature_flags WHERE feature_key = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, FeatureFlag>(&query)
            .bind(key.as_str())
            .fetch_optional(&mut *conn)
            .await
    }

    async fn record(
        conn: &mut PgConnection,
        flag: &FeatureFlag,
        new_state: bool,
        changed_by: &str,
        reason: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO feature_flag_history \
                (feature_flag_id, feature_key, previous_state, new_state, changed_by, reason) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(flag.id)
        .bind(flag.feature_key.as_str())
        .bind(flag.enabled)
        .bind(new_state)
        .bind(changed_by)
        .bind(reason)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Lock the flag, decide the new state from the current one, and write
    /// the history row plus the update when the state actually changes.
    async fn transition(
        conn: &mut PgConnection,
        key: FeatureKey,
        requested: impl FnOnce(bool) -> bool,
        changed_by: &str,
        reason: &str,
    ) -> Result<Option<FlagUpdate>, sqlx::Error> {
        let Some(flag) = Self::lock(&mut *conn, key).await? else {
            return Ok(None);
        };

        let change = plan_change(flag.enabled, requested(flag.enabled));
        let FlagChange::Changed { new, previous } = change else {
            return Ok(Some(FlagUpdate { flag, change }));
        };

        Self::record(&mut *conn, &flag, new, changed_by, reason).await?;
        let query = format!(
            "UPDATE feature_flags SET enabled = $2, last_modified_by = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let flag = sqlx::query_as::<_, FeatureFlag>(&query)
            .bind(flag.id)
            .bind(new)
            .bind(changed_by)
            .fetch_one(&mut *conn)
            .await?;

        tracing::info!(
            feature_key = %key,
            previous,
            new,
            changed_by,
            "Feature flag state changed"
        );
        Ok(Some(FlagUpdate { flag, change }))
    }
}
