//! Repository for the `aircraft_corrections` table.

use mosaic_core::choices::CorrectionStatus;
use mosaic_core::correction::ReviewOutcome;
use mosaic_core::types::DbId;
use sqlx::PgPool;

use crate::models::correction::{AircraftCorrection, CreateCorrection};
use crate::repositories::{AircraftRepo, EngineRepo};

/// Column list for correction queries (aliased `c`, joined to `a` and `m`).
const COLUMNS: &str = "\
    c.id, c.aircraft_id, m.name || ' ' || a.model AS aircraft_name, \
    c.field_name, c.current_value, c.suggested_value, c.reason, \
    c.source_documentation, c.submitter_email, c.submitter_name, c.status, \
    c.admin_notes, c.reviewed_at, c.created_at, c.updated_at";

const FROM: &str = "aircraft_corrections c \
    JOIN aircraft a ON a.id = c.aircraft_id \
    JOIN manufacturers m ON m.id = a.manufacturer_id";

/// Provides submission, lookup, and review persistence for corrections.
pub struct CorrectionRepo;

impl CorrectionRepo {
    /// Record a correction with a server-side snapshot of the current value.
    ///
    /// Returns `None` if the referenced aircraft does not exist.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCorrection,
    ) -> Result<Option<AircraftCorrection>, sqlx::Error> {
        let Some(aircraft) = AircraftRepo::find_by_id(pool, input.aircraft_id).await? else {
            return Ok(None);
        };
        let mut engines = EngineRepo::list_for_aircraft(pool, &[aircraft.id]).await?;
        let engines = engines.remove(&aircraft.id).unwrap_or_default();
        let current_value = aircraft.field_snapshot(input.field_name, &engines);

        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO aircraft_corrections \
                (aircraft_id, field_name, current_value, suggested_value, reason, \
                 source_documentation, submitter_email, submitter_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(input.aircraft_id)
        .bind(input.field_name.as_str())
        .bind(&current_value)
        .bind(&input.suggested_value)
        .bind(&input.reason)
        .bind(&input.source_documentation)
        .bind(&input.submitter_email)
        .bind(&input.submitter_name)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Find a correction by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AircraftCorrection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE c.id = $1");
        sqlx::query_as::<_, AircraftCorrection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List corrections, newest first, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<CorrectionStatus>,
    ) -> Result<Vec<AircraftCorrection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE ($1::TEXT IS NULL OR c.status = $1) \
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, AircraftCorrection>(&query)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Persist a review decision and stamp `reviewed_at`.
    pub async fn apply_review(
        pool: &PgPool,
        id: DbId,
        outcome: &ReviewOutcome,
    ) -> Result<Option<AircraftCorrection>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE aircraft_corrections \
             SET status = $2, admin_notes = $3, reviewed_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(outcome.status.as_str())
        .bind(&outcome.admin_notes)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }
}
