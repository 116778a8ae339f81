//! Query-string parameter types for the list endpoints.
//!
//! Invalid values make the `Query` extractor reject the request with 400.

use chrono::NaiveDate;
use mosaic_core::choices::{CorrectionStatus, EngineType, FuelType};
use mosaic_core::types::DbId;
use mosaic_db::models::aircraft::AircraftFilter;
use mosaic_db::models::engine::EngineFilter;
use mosaic_db::models::manufacturer::ManufacturerFilter;
use serde::{Deserialize, Deserializer};

/// Parse a boolean filter accepting `true/false/True/False/1/0`.
///
/// An empty value means "no filter".
fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some("true" | "True" | "1") => Ok(Some(true)),
        Some("false" | "False" | "0") => Ok(Some(false)),
        Some(other) => Err(serde::de::Error::custom(format!(
            "'{other}' is not a valid boolean. Use true/false, True/False, or 1/0"
        ))),
    }
}

/// `GET /v1/manufacturers/`
#[derive(Debug, Default, Deserialize)]
pub struct ManufacturerListParams {
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_currently_manufacturing: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl From<ManufacturerListParams> for ManufacturerFilter {
    fn from(p: ManufacturerListParams) -> Self {
        Self {
            is_currently_manufacturing: p.is_currently_manufacturing,
            search: p.search,
            ordering: p.ordering,
        }
    }
}

/// `GET /v1/aircraft/`
#[derive(Debug, Default, Deserialize)]
pub struct AircraftListParams {
    pub manufacturer: Option<DbId>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_mosaic_compliant: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub sport_pilot_eligible: Option<bool>,
    pub seating_capacity: Option<i32>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub retractable_gear: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub variable_pitch_prop: Option<bool>,
    pub certification_date: Option<NaiveDate>,
    #[serde(
        default,
        rename = "manufacturer__is_currently_manufacturing",
        deserialize_with = "flexible_bool"
    )]
    pub manufacturer_is_currently_manufacturing: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl From<AircraftListParams> for AircraftFilter {
    fn from(p: AircraftListParams) -> Self {
        Self {
            manufacturer_id: p.manufacturer,
            is_mosaic_compliant: p.is_mosaic_compliant,
            sport_pilot_eligible: p.sport_pilot_eligible,
            seating_capacity: p.seating_capacity,
            retractable_gear: p.retractable_gear,
            variable_pitch_prop: p.variable_pitch_prop,
            certification_date: p.certification_date,
            manufacturer_is_currently_manufacturing: p.manufacturer_is_currently_manufacturing,
            search: p.search,
            ordering: p.ordering,
        }
    }
}

/// `GET /v1/engines/`
#[derive(Debug, Default, Deserialize)]
pub struct EngineListParams {
    pub fuel_type: Option<FuelType>,
    pub engine_type: Option<EngineType>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub is_fuel_injected: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl From<EngineListParams> for EngineFilter {
    fn from(p: EngineListParams) -> Self {
        Self {
            fuel_type: p.fuel_type,
            engine_type: p.engine_type,
            is_fuel_injected: p.is_fuel_injected,
            search: p.search,
            ordering: p.ordering,
        }
    }
}

/// `GET /v1/aircraft/compare/`. Parsed by `mosaic_core::listing::parse_id_list`.
#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    pub ids: Option<String>,
}

/// `GET /v1/admin/corrections/`
#[derive(Debug, Default, Deserialize)]
pub struct CorrectionListParams {
    pub status: Option<CorrectionStatus>,
}

/// Default number of history rows returned per flag.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// `GET /v1/admin/feature-flags/{key}/history/`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

impl HistoryParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, 500)
    }
}
