//! Repository for the `aircraft` table.
//!
//! Every insert and update recomputes the two eligibility flags from the
//! clean stall speed before the row is written; clients never supply them.

use mosaic_core::eligibility::Eligibility;
use mosaic_core::listing::{search_patterns, OrderField, Ordering};
use mosaic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::aircraft::{
    Aircraft, AircraftDetailView, AircraftFilter, AircraftInput, AircraftView,
};
use crate::repositories::{EngineRepo, ManufacturerRepo};

/// Column list for `aircraft` queries. Requires `aircraft a JOIN manufacturers m`.
const COLUMNS: &str = "\
    a.id, a.manufacturer_id, m.name AS manufacturer_name, a.model, \
    a.clean_stall_speed, a.top_speed, a.maneuvering_speed, a.cruise_speed, \
    a.vx_speed, a.vy_speed, a.vs0_speed, a.vg_speed, a.vfe_speed, \
    a.vno_speed, a.vne_speed, a.vlo_speed, a.vle_speed, \
    a.max_takeoff_weight, a.seating_capacity, a.retractable_gear, \
    a.variable_pitch_prop, a.is_mosaic_compliant, a.sport_pilot_eligible, \
    a.certification_date, a.verification_source, a.image, \
    a.created_at, a.updated_at";

const FROM: &str = "aircraft a JOIN manufacturers m ON m.id = a.manufacturer_id";

const ORDERING: Ordering = Ordering {
    fields: &[
        OrderField { name: "model", column: "a.model" },
        OrderField { name: "clean_stall_speed", column: "a.clean_stall_speed" },
        OrderField { name: "top_speed", column: "a.top_speed" },
        OrderField { name: "maneuvering_speed", column: "a.maneuvering_speed" },
        OrderField { name: "cruise_speed", column: "a.cruise_speed" },
        OrderField { name: "max_takeoff_weight", column: "a.max_takeoff_weight" },
        OrderField { name: "seating_capacity", column: "a.seating_capacity" },
        OrderField { name: "certification_date", column: "a.certification_date" },
        OrderField { name: "manufacturer__name", column: "m.name" },
    ],
    default: &["manufacturer__name", "model"],
    tiebreak: "a.id ASC",
};

/// Provides CRUD, listing, and comparison queries for aircraft.
pub struct AircraftRepo;

impl AircraftRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find an aircraft by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE a.id = $1");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List aircraft matching every set filter, searched and ordered.
    pub async fn list(pool: &PgPool, filter: &AircraftFilter) -> Result<Vec<Aircraft>, sqlx::Error> {
        let order_by = ORDERING.order_by(filter.ordering.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE ($1::BIGINT IS NULL OR a.manufacturer_id = $1) \
               AND ($2::BOOLEAN IS NULL OR a.is_mosaic_compliant = $2) \
               AND ($3::BOOLEAN IS NULL OR a.sport_pilot_eligible = $3) \
               AND ($4::INTEGER IS NULL OR a.seating_capacity = $4) \
               AND ($5::BOOLEAN IS NULL OR a.retractable_gear = $5) \
               AND ($6::BOOLEAN IS NULL OR a.variable_pitch_prop = $6) \
               AND ($7::DATE IS NULL OR a.certification_date = $7) \
               AND ($8::BOOLEAN IS NULL OR m.is_currently_manufacturing = $8) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM unnest($9::TEXT[]) AS s(pattern) \
                   WHERE NOT (a.model ILIKE s.pattern OR m.name ILIKE s.pattern)) \
             ORDER BY {order_by}"
        );
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(filter.manufacturer_id)
            .bind(filter.is_mosaic_compliant)
            .bind(filter.sport_pilot_eligible)
            .bind(filter.seating_capacity)
            .bind(filter.retractable_gear)
            .bind(filter.variable_pitch_prop)
            .bind(filter.certification_date)
            .bind(filter.manufacturer_is_currently_manufacturing)
            .bind(search_patterns(filter.search.as_deref()))
            .fetch_all(pool)
            .await
    }

    /// [`list`](Self::list) with engines and derived fields attached.
    pub async fn list_views(
        pool: &PgPool,
        filter: &AircraftFilter,
    ) -> Result<Vec<AircraftView>, sqlx::Error> {
        let aircraft = Self::list(pool, filter).await?;
        let ids: Vec<DbId> = aircraft.iter().map(|a| a.id).collect();
        let mut engines = EngineRepo::list_for_aircraft(pool, &ids).await?;

        Ok(aircraft
            .into_iter()
            .map(|a| {
                let own = engines.remove(&a.id).unwrap_or_default();
                AircraftView::new(a, own)
            })
            .collect())
    }

    /// A single list-shaped aircraft.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<AircraftView>, sqlx::Error> {
        let Some(aircraft) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut engines = EngineRepo::list_for_aircraft(pool, &[id]).await?;
        let own = engines.remove(&id).unwrap_or_default();
        Ok(Some(AircraftView::new(aircraft, own)))
    }

    /// A single detail-shaped aircraft with nested manufacturer and analysis.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AircraftDetailView>, sqlx::Error> {
        let mut details = Self::compare(pool, &[id]).await?;
        Ok(details.pop())
    }

    /// Detail-shaped records for every id that exists, in request order.
    ///
    /// Unknown ids are skipped silently.
    pub async fn compare(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<AircraftDetailView>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE a.id = ANY($1)");
        let mut found = sqlx::query_as::<_, Aircraft>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        found.sort_by_key(|a| ids.iter().position(|id| *id == a.id));

        let aircraft_ids: Vec<DbId> = found.iter().map(|a| a.id).collect();
        let mut manufacturer_ids: Vec<DbId> = found.iter().map(|a| a.manufacturer_id).collect();
        manufacturer_ids.sort_unstable();
        manufacturer_ids.dedup();

        let mut engines = EngineRepo::list_for_aircraft(pool, &aircraft_ids).await?;
        let manufacturers = ManufacturerRepo::find_by_ids(pool, &manufacturer_ids).await?;

        let mut details = Vec::with_capacity(found.len());
        for aircraft in found {
            // The join guarantees the manufacturer exists.
            let Some(manufacturer) = manufacturers
                .iter()
                .find(|m| m.id == aircraft.manufacturer_id)
                .cloned()
            else {
                continue;
            };
            let own = engines.remove(&aircraft.id).unwrap_or_default();
            details.push(AircraftDetailView::new(aircraft, manufacturer, own));
        }
        Ok(details)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert an aircraft (and its engine set, if given) in one transaction.
    pub async fn create(pool: &PgPool, input: &AircraftInput) -> Result<Aircraft, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let id = Self::insert(&mut *tx, input).await?;
        if let Some(engine_ids) = &input.engine_ids {
            Self::replace_engines(&mut *tx, id, engine_ids).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace every writable field and reclassify.
    ///
    /// The engine set is replaced only when `input.engine_ids` is present.
    /// Returns `None` if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &AircraftInput,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let updated = Self::update_row(&mut *tx, id, input).await?;
        if !updated {
            return Ok(None);
        }
        if let Some(engine_ids) = &input.engine_ids {
            Self::replace_engines(&mut *tx, id, engine_ids).await?;
        }
        tx.commit().await?;

        Self::find_by_id(pool, id).await
    }

    /// Delete an aircraft. Engines survive; only the links are removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Connection-level helpers (transactions, seed loading)
    // -----------------------------------------------------------------------

    /// Insert one aircraft row with freshly classified flags.
    pub async fn insert(conn: &mut PgConnection, input: &AircraftInput) -> Result<DbId, sqlx::Error> {
        let eligibility = input.classify();
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO aircraft \
                (manufacturer_id, model, clean_stall_speed, top_speed, maneuvering_speed, \
                 cruise_speed, vx_speed, vy_speed, vs0_speed, vg_speed, vfe_speed, \
                 vno_speed, vne_speed, vlo_speed, vle_speed, max_takeoff_weight, \
                 seating_capacity, retractable_gear, variable_pitch_prop, \
                 is_mosaic_compliant, sport_pilot_eligible, certification_date, \
                 verification_source, image) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24) \
             RETURNING id",
        )
        .bind(input.manufacturer_id)
        .bind(&input.model)
        .bind(&input.clean_stall_speed)
        .bind(&input.top_speed)
        .bind(&input.maneuvering_speed)
        .bind(&input.cruise_speed)
        .bind(&input.vx_speed)
        .bind(&input.vy_speed)
        .bind(&input.vs0_speed)
        .bind(&input.vg_speed)
        .bind(&input.vfe_speed)
        .bind(&input.vno_speed)
        .bind(&input.vne_speed)
        .bind(&input.vlo_speed)
        .bind(&input.vle_speed)
        .bind(input.max_takeoff_weight)
        .bind(input.seating_capacity)
        .bind(input.retractable_gear)
        .bind(input.variable_pitch_prop)
        .bind(eligibility.mosaic_compliant)
        .bind(eligibility.sport_pilot_eligible)
        .bind(input.certification_date)
        .bind(&input.verification_source)
        .bind(&input.image)
        .fetch_one(&mut *conn)
        .await?;

        tracing::info!(
            aircraft_id = id,
            model = %input.model,
            sport_pilot_eligible = eligibility.sport_pilot_eligible,
            mosaic_compliant = eligibility.mosaic_compliant,
            "Aircraft inserted"
        );
        Ok(id)
    }

    /// Overwrite one aircraft row, reclassifying from its current flags.
    ///
    /// Returns `false` if the id does not exist.
    pub async fn update_row(
        conn: &mut PgConnection,
        id: DbId,
        input: &AircraftInput,
    ) -> Result<bool, sqlx::Error> {
        let current: Option<(bool, bool)> = sqlx::query_as(
            "SELECT sport_pilot_eligible, is_mosaic_compliant FROM aircraft \
             WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        let Some((sport_pilot_eligible, mosaic_compliant)) = current else {
            return Ok(false);
        };

        let eligibility = Eligibility {
            sport_pilot_eligible,
            mosaic_compliant,
        }
        .reclassify(Some(&input.clean_stall_speed), input.certification_date);

        sqlx::query(
            "UPDATE aircraft SET \
                manufacturer_id = $2, model = $3, clean_stall_speed = $4, \
                top_speed = $5, maneuvering_speed = $6, cruise_speed = $7, \
                vx_speed = $8, vy_speed = $9, vs0_speed = $10, vg_speed = $11, \
                vfe_speed = $12, vno_speed = $13, vne_speed = $14, vlo_speed = $15, \
                vle_speed = $16, max_takeoff_weight = $17, seating_capacity = $18, \
                retractable_gear = $19, variable_pitch_prop = $20, \
                is_mosaic_compliant = $21, sport_pilot_eligible = $22, \
                certification_date = $23, verification_source = $24, image = $25 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.manufacturer_id)
        .bind(&input.model)
        .bind(&input.clean_stall_speed)
        .bind(&input.top_speed)
        .bind(&input.maneuvering_speed)
        .bind(&input.cruise_speed)
        .bind(&input.vx_speed)
        .bind(&input.vy_speed)
        .bind(&input.vs0_speed)
        .bind(&input.vg_speed)
        .bind(&input.vfe_speed)
        .bind(&input.vno_speed)
        .bind(&input.vne_speed)
        .bind(&input.vlo_speed)
        .bind(&input.vle_speed)
        .bind(input.max_takeoff_weight)
        .bind(input.seating_capacity)
        .bind(input.retractable_gear)
        .bind(input.variable_pitch_prop)
        .bind(eligibility.mosaic_compliant)
        .bind(eligibility.sport_pilot_eligible)
        .bind(input.certification_date)
        .bind(&input.verification_source)
        .bind(&input.image)
        .execute(&mut *conn)
        .await?;

        tracing::info!(
            aircraft_id = id,
            sport_pilot_eligible = eligibility.sport_pilot_eligible,
            mosaic_compliant = eligibility.mosaic_compliant,
            "Aircraft updated"
        );
        Ok(true)
    }

    /// Make `engine_ids` the complete engine set of an aircraft.
    pub async fn replace_engines(
        conn: &mut PgConnection,
        aircraft_id: DbId,
        engine_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM aircraft_engines WHERE aircraft_id = $1")
            .bind(aircraft_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            "INSERT INTO aircraft_engines (aircraft_id, engine_id) \
             SELECT $1, engine_id FROM unnest($2::BIGINT[]) AS e(engine_id) \
             ON CONFLICT (aircraft_id, engine_id) DO NOTHING",
        )
        .bind(aircraft_id)
        .bind(engine_ids)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Link one engine to an aircraft. Returns `true` if the link is new.
    pub async fn add_engine(
        conn: &mut PgConnection,
        aircraft_id: DbId,
        engine_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO aircraft_engines (aircraft_id, engine_id) VALUES ($1, $2) \
             ON CONFLICT (aircraft_id, engine_id) DO NOTHING",
        )
        .bind(aircraft_id)
        .bind(engine_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Id of the aircraft `model` built by `manufacturer_id`, if any.
    pub async fn find_id_by_model(
        conn: &mut PgConnection,
        manufacturer_id: DbId,
        model: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM aircraft WHERE manufacturer_id = $1 AND model = $2")
                .bind(manufacturer_id)
                .bind(model)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(row.map(|(id,)| id))
    }

    /// Find an aircraft by manufacturer name and model.
    pub async fn find_by_manufacturer_and_model(
        pool: &PgPool,
        manufacturer: &str,
        model: &str,
    ) -> Result<Option<Aircraft>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE m.name = $1 AND a.model = $2");
        sqlx::query_as::<_, Aircraft>(&query)
            .bind(manufacturer)
            .bind(model)
            .fetch_optional(pool)
            .await
    }
}
