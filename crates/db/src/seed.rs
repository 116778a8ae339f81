//! Curated aircraft dataset and its loader.
//!
//! The dataset is embedded at compile time. Loading is get-or-create at every
//! level (manufacturer by name, engine by manufacturer and model, aircraft by
//! manufacturer and model), so running it twice changes nothing. Records
//! that fail field validation are skipped and reported, never inserted.

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mosaic_core::choices::{EngineType, FuelType};
use mosaic_core::types::DbId;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use validator::Validate;

use crate::models::aircraft::AircraftInput;
use crate::models::engine::EngineInput;
use crate::repositories::{AircraftRepo, EngineRepo, ManufacturerRepo};

const AIRCRAFT_DATA: &str = include_str!("../seed/aircraft.json");
const CRUISE_SPEED_DATA: &str = include_str!("../seed/cruise_speeds.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Unknown seed group '{name}'. Available groups: {available}")]
    UnknownGroup { name: String, available: String },

    #[error("Embedded seed data is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Dataset shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SeedFile {
    manufacturers: Vec<SeedManufacturer>,
    groups: Vec<SeedGroup>,
}

#[derive(Debug, Deserialize)]
struct SeedManufacturer {
    name: String,
    is_currently_manufacturing: bool,
}

/// Records stay raw until loading so one malformed entry is skipped
/// instead of failing the whole file.
#[derive(Debug, Deserialize)]
struct SeedGroup {
    name: String,
    aircraft: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SeedEngine {
    manufacturer: String,
    model: String,
    horsepower: i32,
    displacement_liters: Option<BigDecimal>,
    #[serde(default)]
    fuel_type: FuelType,
    #[serde(default)]
    engine_type: EngineType,
    #[serde(default)]
    is_fuel_injected: bool,
}

#[derive(Debug, Deserialize)]
struct SeedAircraft {
    manufacturer: String,
    model: String,
    clean_stall_speed: BigDecimal,
    top_speed: BigDecimal,
    maneuvering_speed: BigDecimal,
    cruise_speed: Option<BigDecimal>,
    vx_speed: Option<BigDecimal>,
    vy_speed: Option<BigDecimal>,
    vs0_speed: Option<BigDecimal>,
    vg_speed: Option<BigDecimal>,
    vfe_speed: Option<BigDecimal>,
    vno_speed: Option<BigDecimal>,
    vne_speed: Option<BigDecimal>,
    vlo_speed: Option<BigDecimal>,
    vle_speed: Option<BigDecimal>,
    max_takeoff_weight: Option<i32>,
    seating_capacity: i32,
    retractable_gear: bool,
    variable_pitch_prop: bool,
    certification_date: Option<NaiveDate>,
    #[serde(default)]
    verification_source: String,
    engine: SeedEngine,
}

impl SeedEngine {
    fn to_input(&self) -> EngineInput {
        EngineInput {
            manufacturer: self.manufacturer.clone(),
            model: self.model.clone(),
            horsepower: self.horsepower,
            displacement_liters: self.displacement_liters.clone(),
            fuel_type: self.fuel_type,
            engine_type: self.engine_type,
            is_fuel_injected: self.is_fuel_injected,
        }
    }
}

impl SeedAircraft {
    fn to_input(&self, manufacturer_id: DbId) -> AircraftInput {
        AircraftInput {
            manufacturer_id,
            model: self.model.clone(),
            clean_stall_speed: self.clean_stall_speed.clone(),
            top_speed: self.top_speed.clone(),
            maneuvering_speed: self.maneuvering_speed.clone(),
            cruise_speed: self.cruise_speed.clone(),
            vx_speed: self.vx_speed.clone(),
            vy_speed: self.vy_speed.clone(),
            vs0_speed: self.vs0_speed.clone(),
            vg_speed: self.vg_speed.clone(),
            vfe_speed: self.vfe_speed.clone(),
            vno_speed: self.vno_speed.clone(),
            vne_speed: self.vne_speed.clone(),
            vlo_speed: self.vlo_speed.clone(),
            vle_speed: self.vle_speed.clone(),
            max_takeoff_weight: self.max_takeoff_weight,
            seating_capacity: self.seating_capacity,
            retractable_gear: self.retractable_gear,
            variable_pitch_prop: self.variable_pitch_prop,
            certification_date: self.certification_date,
            verification_source: self.verification_source.clone(),
            image: None,
            engine_ids: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CruiseSpeed {
    manufacturer: String,
    model: String,
    cruise_speed: BigDecimal,
}

fn parse_dataset(json: &str) -> Result<SeedFile, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Names of the groups in the embedded dataset, in file order.
pub fn group_names() -> Result<Vec<String>, SeedError> {
    Ok(parse_dataset(AIRCRAFT_DATA)?
        .groups
        .into_iter()
        .map(|g| g.name)
        .collect())
}

/// `"<manufacturer> <model>"` for a record that may not have decoded.
fn record_label(raw: &serde_json::Value) -> String {
    let field = |key: &str| raw.get(key).and_then(|v| v.as_str()).unwrap_or("?");
    format!("{} {}", field("manufacturer"), field("model"))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// A record left out of the load because it did not decode or failed validation.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub group: String,
    pub aircraft: String,
    pub reason: String,
}

/// Counts from one [`load`] run.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub manufacturers_created: usize,
    pub engines_created: usize,
    pub aircraft_created: usize,
    pub aircraft_existing: usize,
    pub links_created: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Load the named groups of the embedded dataset, or every group when
/// `groups` is empty.
///
/// With `atomic` the whole load runs in one transaction and any database
/// error rolls everything back; otherwise each record commits on its own.
pub async fn load(pool: &PgPool, groups: &[String], atomic: bool) -> Result<SeedReport, SeedError> {
    load_json(pool, AIRCRAFT_DATA, groups, atomic).await
}

/// [`load`] for a dataset supplied as JSON in the embedded file's shape.
pub async fn load_json(
    pool: &PgPool,
    json: &str,
    groups: &[String],
    atomic: bool,
) -> Result<SeedReport, SeedError> {
    let data = parse_dataset(json)?;

    if let Some(unknown) = groups
        .iter()
        .find(|name| !data.groups.iter().any(|g| &g.name == *name))
    {
        return Err(SeedError::UnknownGroup {
            name: unknown.clone(),
            available: data
                .groups
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let selected: Vec<&SeedGroup> = data
        .groups
        .iter()
        .filter(|g| groups.is_empty() || groups.contains(&g.name))
        .collect();

    let report = if atomic {
        let mut tx = pool.begin().await?;
        let report = load_groups(&mut *tx, &data.manufacturers, &selected).await?;
        tx.commit().await?;
        report
    } else {
        let mut conn = pool.acquire().await?;
        load_groups(&mut *conn, &data.manufacturers, &selected).await?
    };

    tracing::info!(
        manufacturers_created = report.manufacturers_created,
        engines_created = report.engines_created,
        aircraft_created = report.aircraft_created,
        aircraft_existing = report.aircraft_existing,
        skipped = report.skipped.len(),
        atomic,
        "Seed load finished"
    );
    Ok(report)
}

async fn load_groups(
    conn: &mut PgConnection,
    manufacturers: &[SeedManufacturer],
    groups: &[&SeedGroup],
) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();
    let mut manufacturer_ids: HashMap<String, DbId> = HashMap::new();

    for group in groups {
        for raw in &group.aircraft {
            let record: SeedAircraft = match serde_json::from_value(raw.clone()) {
                Ok(record) => record,
                Err(e) => {
                    let aircraft = record_label(raw);
                    tracing::warn!(
                        group = %group.name,
                        %aircraft,
                        error = %e,
                        "Skipping malformed seed record"
                    );
                    report.skipped.push(SkippedRecord {
                        group: group.name.clone(),
                        aircraft,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let engine_input = record.engine.to_input();
            // The manufacturer id is not validated, so a placeholder is fine here.
            let aircraft_input = record.to_input(0);

            let invalid = engine_input
                .validate()
                .err()
                .or_else(|| aircraft_input.validate().err());
            if let Some(errors) = invalid {
                tracing::warn!(
                    group = %group.name,
                    manufacturer = %record.manufacturer,
                    model = %record.model,
                    %errors,
                    "Skipping invalid seed record"
                );
                report.skipped.push(SkippedRecord {
                    group: group.name.clone(),
                    aircraft: format!("{} {}", record.manufacturer, record.model),
                    reason: errors.to_string(),
                });
                continue;
            }

            let manufacturer_id = match manufacturer_ids.get(&record.manufacturer) {
                Some(id) => *id,
                None => {
                    let currently_manufacturing = manufacturers
                        .iter()
                        .find(|m| m.name == record.manufacturer)
                        .map_or(true, |m| m.is_currently_manufacturing);
                    let (id, created) = ManufacturerRepo::get_or_create(
                        &mut *conn,
                        &record.manufacturer,
                        currently_manufacturing,
                    )
                    .await?;
                    if created {
                        report.manufacturers_created += 1;
                    }
                    manufacturer_ids.insert(record.manufacturer.clone(), id);
                    id
                }
            };

            let (engine_id, engine_created) = EngineRepo::get_or_create(&mut *conn, &engine_input).await?;
            if engine_created {
                report.engines_created += 1;
            }

            let aircraft_id =
                match AircraftRepo::find_id_by_model(&mut *conn, manufacturer_id, &record.model).await? {
                    Some(id) => {
                        report.aircraft_existing += 1;
                        id
                    }
                    None => {
                        report.aircraft_created += 1;
                        AircraftRepo::insert(&mut *conn, &record.to_input(manufacturer_id)).await?
                    }
                };

            if AircraftRepo::add_engine(&mut *conn, aircraft_id, engine_id).await? {
                report.links_created += 1;
            }
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Cruise speeds
// ---------------------------------------------------------------------------

/// Counts from one [`update_cruise_speeds`] run.
#[derive(Debug, Clone, Default)]
pub struct CruiseSpeedReport {
    pub updated: usize,
    /// Aircraft that already had a cruise speed.
    pub skipped: usize,
    /// `(manufacturer, model)` pairs with no matching aircraft.
    pub not_found: Vec<(String, String)>,
}

/// Fill in missing cruise speeds from the embedded table.
///
/// Each change goes through the regular aircraft update path, so the
/// eligibility flags are recomputed as for any other write.
pub async fn update_cruise_speeds(pool: &PgPool) -> Result<CruiseSpeedReport, SeedError> {
    let speeds: Vec<CruiseSpeed> = serde_json::from_str(CRUISE_SPEED_DATA)?;
    let mut report = CruiseSpeedReport::default();

    for entry in speeds {
        let Some(aircraft) =
            AircraftRepo::find_by_manufacturer_and_model(pool, &entry.manufacturer, &entry.model)
                .await?
        else {
            report.not_found.push((entry.manufacturer, entry.model));
            continue;
        };

        if aircraft.cruise_speed.is_some() {
            report.skipped += 1;
            continue;
        }

        let mut input = AircraftInput::from_row(&aircraft);
        input.cruise_speed = Some(entry.cruise_speed);
        AircraftRepo::update(pool, aircraft.id, &input).await?;
        report.updated += 1;
    }

    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        not_found = report.not_found.len(),
        "Cruise speed update finished"
    );
    Ok(report)
}
