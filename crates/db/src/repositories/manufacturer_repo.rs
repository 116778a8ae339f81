//! Repository for the `manufacturers` table.

use mosaic_core::listing::{search_patterns, OrderField, Ordering};
use mosaic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::manufacturer::{Manufacturer, ManufacturerFilter, ManufacturerInput};

/// Column list for `manufacturers` queries (aliased `m`).
const COLUMNS: &str = "\
    m.id, m.name, m.logo, m.is_currently_manufacturing, \
    (SELECT COUNT(*) FROM aircraft a WHERE a.manufacturer_id = m.id) AS aircraft_count, \
    m.created_at, m.updated_at";

const ORDERING: Ordering = Ordering {
    fields: &[
        OrderField { name: "name", column: "m.name" },
        OrderField { name: "created_at", column: "m.created_at" },
    ],
    default: &["name"],
    tiebreak: "m.id ASC",
};

/// Provides CRUD operations for manufacturers.
pub struct ManufacturerRepo;

impl ManufacturerRepo {
    /// Insert a new manufacturer, returning the full row.
    pub async fn create(pool: &PgPool, input: &ManufacturerInput) -> Result<Manufacturer, sqlx::Error> {
        let query = format!(
            "INSERT INTO manufacturers AS m (name, logo, is_currently_manufacturing) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(&input.name)
            .bind(&input.logo)
            .bind(input.is_currently_manufacturing)
            .fetch_one(pool)
            .await
    }

    /// Find a manufacturer by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers m WHERE m.id = $1");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every manufacturer whose id is in `ids`.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Manufacturer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM manufacturers m WHERE m.id = ANY($1)");
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List manufacturers with optional filter, name search, and ordering.
    pub async fn list(pool: &PgPool, filter: &ManufacturerFilter) -> Result<Vec<Manufacturer>, sqlx::Error> {
        let order_by = ORDERING.order_by(filter.ordering.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM manufacturers m \
             WHERE ($1::BOOLEAN IS NULL OR m.is_currently_manufacturing = $1) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM unnest($2::TEXT[]) AS s(pattern) \
                   WHERE m.name NOT ILIKE s.pattern) \
             ORDER BY {order_by}"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(filter.is_currently_manufacturing)
            .bind(search_patterns(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    /// Replace all writable fields. Returns `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ManufacturerInput,
    ) -> Result<Option<Manufacturer>, sqlx::Error> {
        let query = format!(
            "UPDATE manufacturers AS m SET \
                name = $2, logo = $3, is_currently_manufacturing = $4 \
             WHERE m.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Manufacturer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.logo)
            .bind(input.is_currently_manufacturing)
            .fetch_optional(pool)
            .await
    }

    /// Delete a manufacturer and, by cascade, its aircraft.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM manufacturers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the id for `name`, creating the manufacturer if needed.
    ///
    /// The boolean is `true` when a new row was inserted.
    pub async fn get_or_create(
        conn: &mut PgConnection,
        name: &str,
        is_currently_manufacturing: bool,
    ) -> Result<(DbId, bool), sqlx::Error> {
        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO manufacturers (name, is_currently_manufacturing) \
             VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING \
             RETURNING id",
        )
        .bind(name)
        .bind(is_currently_manufacturing)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some((id,)) = inserted {
            return Ok((id, true));
        }

        let (id,): (DbId,) = sqlx::query_as("SELECT id FROM manufacturers WHERE name = $1")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        Ok((id, false))
    }
}
