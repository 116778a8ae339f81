//! Repository for the `engines` table and the `aircraft_engines` link.

use std::collections::HashMap;

use mosaic_core::listing::{search_patterns, OrderField, Ordering};
use mosaic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::engine::{AircraftEngine, Engine, EngineFilter, EngineInput};

/// Column list for `engines` queries (aliased `e`).
const COLUMNS: &str = "\
    e.id, e.manufacturer, e.model, e.horsepower, e.displacement_liters, \
    e.fuel_type, e.engine_type, e.is_fuel_injected, e.created_at, e.updated_at";

const ORDERING: Ordering = Ordering {
    fields: &[
        OrderField { name: "manufacturer", column: "e.manufacturer" },
        OrderField { name: "model", column: "e.model" },
        OrderField { name: "horsepower", column: "e.horsepower" },
    ],
    default: &["manufacturer", "model"],
    tiebreak: "e.id ASC",
};

/// Provides CRUD operations for engines.
pub struct EngineRepo;

impl EngineRepo {
    /// Insert a new engine, returning the created row.
    pub async fn create(pool: &PgPool, input: &EngineInput) -> Result<Engine, sqlx::Error> {
        let query = format!(
            "INSERT INTO engines AS e \
                (manufacturer, model, horsepower, displacement_liters, \
                 fuel_type, engine_type, is_fuel_injected) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Engine>(&query)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(input.horsepower)
            .bind(&input.displacement_liters)
            .bind(input.fuel_type.as_str())
            .bind(input.engine_type.as_str())
            .bind(input.is_fuel_injected)
            .fetch_one(pool)
            .await
    }

    /// Find an engine by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Engine>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM engines e WHERE e.id = $1");
        sqlx::query_as::<_, Engine>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List engines with optional filters, search, and ordering.
    pub async fn list(pool: &PgPool, filter: &EngineFilter) -> Result<Vec<Engine>, sqlx::Error> {
        let order_by = ORDERING.order_by(filter.ordering.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM engines e \
             WHERE ($1::TEXT IS NULL OR e.fuel_type = $1) \
               AND ($2::TEXT IS NULL OR e.engine_type = $2) \
               AND ($3::BOOLEAN IS NULL OR e.is_fuel_injected = $3) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM unnest($4::TEXT[]) AS s(pattern) \
                   WHERE NOT (e.manufacturer ILIKE s.pattern OR e.model ILIKE s.pattern)) \
             ORDER BY {order_by}"
        );
        sqlx::query_as::<_, Engine>(&query)
            .bind(filter.fuel_type.map(|f| f.as_str()))
            .bind(filter.engine_type.map(|t| t.as_str()))
            .bind(filter.is_fuel_injected)
            .bind(search_patterns(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    /// Replace all writable fields. Returns `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &EngineInput,
    ) -> Result<Option<Engine>, sqlx::Error> {
        let query = format!(
            "UPDATE engines AS e SET \
                manufacturer = $2, model = $3, horsepower = $4, \
                displacement_liters = $5, fuel_type = $6, engine_type = $7, \
                is_fuel_injected = $8 \
             WHERE e.id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Engine>(&query)
            .bind(id)
            .bind(&input.manufacturer)
            .bind(&input.model)
            .bind(input.horsepower)
            .bind(&input.displacement_liters)
            .bind(input.fuel_type.as_str())
            .bind(input.engine_type.as_str())
            .bind(input.is_fuel_injected)
            .fetch_optional(pool)
            .await
    }

    /// Delete an engine. Its aircraft links go with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM engines WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids from `ids` that do not name an existing engine.
    pub async fn missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT wanted.id FROM unnest($1::BIGINT[]) AS wanted(id) \
             WHERE NOT EXISTS (SELECT 1 FROM engines e WHERE e.id = wanted.id) \
             ORDER BY wanted.id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Engines of every aircraft in `aircraft_ids`, keyed by aircraft id.
    ///
    /// Aircraft without engines have no entry.
    pub async fn list_for_aircraft(
        pool: &PgPool,
        aircraft_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Engine>>, sqlx::Error> {
        let query = format!(
            "SELECT ae.aircraft_id, {COLUMNS} \
             FROM aircraft_engines ae \
             JOIN engines e ON e.id = ae.engine_id \
             WHERE ae.aircraft_id = ANY($1) \
             ORDER BY ae.aircraft_id, e.manufacturer, e.model, e.id"
        );
        let rows = sqlx::query_as::<_, AircraftEngine>(&query)
            .bind(aircraft_ids)
            .fetch_all(pool)
            .await?;

        let mut by_aircraft: HashMap<DbId, Vec<Engine>> = HashMap::new();
        for row in rows {
            by_aircraft.entry(row.aircraft_id).or_default().push(row.engine);
        }
        Ok(by_aircraft)
    }

    /// Return the id for `(manufacturer, model)`, creating the engine if needed.
    ///
    /// An existing engine is left untouched. The boolean is `true` when a new
    /// row was inserted.
    pub async fn get_or_create(
        conn: &mut PgConnection,
        input: &EngineInput,
    ) -> Result<(DbId, bool), sqlx::Error> {
        let inserted: Option<(DbId,)> = sqlx::query_as(
            "INSERT INTO engines \
                (manufacturer, model, horsepower, displacement_liters, \
                 fuel_type, engine_type, is_fuel_injected) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (manufacturer, model) DO NOTHING \
             RETURNING id",
        )
        .bind(&input.manufacturer)
        .bind(&input.model)
        .bind(input.horsepower)
        .bind(&input.displacement_liters)
        .bind(input.fuel_type.as_str())
        .bind(input.engine_type.as_str())
        .bind(input.is_fuel_injected)
        .fetch_optional(&mut *conn)
        .await?;

        if let Some((id,)) = inserted {
            return Ok((id, true));
        }

        let (id,): (DbId,) =
            sqlx::query_as("SELECT id FROM engines WHERE manufacturer = $1 AND model = $2")
                .bind(&input.manufacturer)
                .bind(&input.model)
                .fetch_one(&mut *conn)
                .await?;
        Ok((id, false))
    }
}
