//! Engine entity model and DTOs.

use std::fmt;

use bigdecimal::BigDecimal;
use mosaic_core::choices::{EngineType, FuelType};
use mosaic_core::patch::{double_option, merge_nullable};
use mosaic_core::types::{DbId, Timestamp};
use mosaic_core::validation::{
    validate_displacement, validate_not_blank, MAX_HORSEPOWER, MIN_HORSEPOWER,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `engines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Engine {
    pub id: DbId,
    pub manufacturer: String,
    pub model: String,
    pub horsepower: i32,
    pub displacement_liters: Option<BigDecimal>,
    #[sqlx(try_from = "String")]
    pub fuel_type: FuelType,
    #[sqlx(try_from = "String")]
    pub engine_type: EngineType,
    pub is_fuel_injected: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl fmt::Display for Engine {
    /// `Lycoming O-320-E2A (150hp)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}hp)", self.manufacturer, self.model, self.horsepower)
    }
}

/// DTO for creating or fully replacing an engine.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EngineInput {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub manufacturer: String,
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub model: String,
    #[validate(range(min = MIN_HORSEPOWER, max = MAX_HORSEPOWER))]
    pub horsepower: i32,
    #[validate(custom(function = "validate_displacement"))]
    pub displacement_liters: Option<BigDecimal>,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default)]
    pub engine_type: EngineType,
    #[serde(default)]
    pub is_fuel_injected: bool,
}

/// DTO for a partial update. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct EnginePatch {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub horsepower: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub displacement_liters: Option<Option<BigDecimal>>,
    pub fuel_type: Option<FuelType>,
    pub engine_type: Option<EngineType>,
    pub is_fuel_injected: Option<bool>,
}

impl EnginePatch {
    pub fn merge(self, current: &Engine) -> EngineInput {
        EngineInput {
            manufacturer: self
                .manufacturer
                .unwrap_or_else(|| current.manufacturer.clone()),
            model: self.model.unwrap_or_else(|| current.model.clone()),
            horsepower: self.horsepower.unwrap_or(current.horsepower),
            displacement_liters: merge_nullable(
                self.displacement_liters,
                current.displacement_liters.clone(),
            ),
            fuel_type: self.fuel_type.unwrap_or(current.fuel_type),
            engine_type: self.engine_type.unwrap_or(current.engine_type),
            is_fuel_injected: self.is_fuel_injected.unwrap_or(current.is_fuel_injected),
        }
    }
}

/// List filters for `GET /engines/`.
#[derive(Debug, Default, Clone)]
pub struct EngineFilter {
    pub fuel_type: Option<FuelType>,
    pub engine_type: Option<EngineType>,
    pub is_fuel_injected: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// An engine joined to one aircraft through `aircraft_engines`.
#[derive(Debug, Clone, FromRow)]
pub struct AircraftEngine {
    pub aircraft_id: DbId,
    #[sqlx(flatten)]
    pub engine: Engine,
}
