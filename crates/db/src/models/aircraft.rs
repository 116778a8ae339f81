//! Aircraft entity model, DTOs, and response views.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mosaic_core::choices::CorrectionField;
use mosaic_core::eligibility::{self, Eligibility, MosaicAnalysis};
use mosaic_core::patch::{double_option, merge_nullable};
use mosaic_core::types::{knots_at_scale, DbId, Timestamp};
use mosaic_core::validation::{
    validate_not_blank, validate_speed, validate_stall_speed, MAX_SEATS,
    MAX_TAKEOFF_WEIGHT_LBS, MIN_SEATS,
};
use serde::{Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use validator::Validate;

use super::engine::Engine;
use super::manufacturer::Manufacturer;

/// A row from the `aircraft` table joined with its manufacturer's name.
///
/// `manufacturer_id` is not serialized here: the list view exposes it as
/// `manufacturer` and the detail view replaces it with the nested object.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Aircraft {
    pub id: DbId,
    #[serde(skip)]
    pub manufacturer_id: DbId,
    pub manufacturer_name: String,
    pub model: String,
    #[serde(serialize_with = "serialize_knots")]
    pub clean_stall_speed: BigDecimal,
    #[serde(serialize_with = "serialize_knots")]
    pub top_speed: BigDecimal,
    #[serde(serialize_with = "serialize_knots")]
    pub maneuvering_speed: BigDecimal,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub cruise_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vx_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vy_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vs0_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vg_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vfe_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vno_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vne_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vlo_speed: Option<BigDecimal>,
    #[serde(serialize_with = "serialize_optional_knots")]
    pub vle_speed: Option<BigDecimal>,
    pub max_takeoff_weight: Option<i32>,
    pub seating_capacity: i32,
    pub retractable_gear: bool,
    pub variable_pitch_prop: bool,
    pub is_mosaic_compliant: bool,
    pub sport_pilot_eligible: bool,
    pub certification_date: Option<NaiveDate>,
    pub verification_source: String,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn serialize_knots<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    knots_at_scale(value).serialize(serializer)
}

fn serialize_optional_knots<S: Serializer>(
    value: &Option<BigDecimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value.as_ref().map(knots_at_scale).serialize(serializer)
}

impl Aircraft {
    /// The persisted eligibility flags.
    pub fn eligibility(&self) -> Eligibility {
        Eligibility {
            sport_pilot_eligible: self.sport_pilot_eligible,
            mosaic_compliant: self.is_mosaic_compliant,
        }
    }

    /// `Cessna 150`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer_name, self.model)
    }

    /// Text snapshot of `field` as stored right now, for correction records.
    ///
    /// Absent optional values snapshot as the empty string.
    pub fn field_snapshot(&self, field: CorrectionField, engines: &[Engine]) -> String {
        fn opt<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        fn knots(value: &BigDecimal) -> String {
            knots_at_scale(value).to_string()
        }
        fn opt_knots(value: &Option<BigDecimal>) -> String {
            value.as_ref().map(knots).unwrap_or_default()
        }

        match field {
            CorrectionField::CleanStallSpeed => knots(&self.clean_stall_speed),
            CorrectionField::TopSpeed => knots(&self.top_speed),
            CorrectionField::ManeuveringSpeed => knots(&self.maneuvering_speed),
            CorrectionField::CruiseSpeed => opt_knots(&self.cruise_speed),
            CorrectionField::VxSpeed => opt_knots(&self.vx_speed),
            CorrectionField::VySpeed => opt_knots(&self.vy_speed),
            CorrectionField::Vs0Speed => opt_knots(&self.vs0_speed),
            CorrectionField::VgSpeed => opt_knots(&self.vg_speed),
            CorrectionField::VfeSpeed => opt_knots(&self.vfe_speed),
            CorrectionField::VnoSpeed => opt_knots(&self.vno_speed),
            CorrectionField::VneSpeed => opt_knots(&self.vne_speed),
            CorrectionField::MaxTakeoffWeight => opt(&self.max_takeoff_weight),
            CorrectionField::SeatingCapacity => self.seating_capacity.to_string(),
            CorrectionField::RetractableGear => self.retractable_gear.to_string(),
            CorrectionField::VariablePitchProp => self.variable_pitch_prop.to_string(),
            CorrectionField::CertificationDate => opt(&self.certification_date),
            CorrectionField::VerificationSource => self.verification_source.clone(),
            CorrectionField::Engines => engines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            CorrectionField::General => String::new(),
        }
    }
}

fn default_seating_capacity() -> i32 {
    2
}

/// DTO for creating or fully replacing an aircraft.
///
/// The two eligibility flags are never accepted from clients; the repository
/// derives them from `clean_stall_speed` on every write.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AircraftInput {
    #[serde(rename = "manufacturer")]
    pub manufacturer_id: DbId,
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub model: String,
    #[validate(custom(function = "validate_stall_speed"))]
    pub clean_stall_speed: BigDecimal,
    #[validate(custom(function = "validate_speed"))]
    pub top_speed: BigDecimal,
    #[validate(custom(function = "validate_speed"))]
    pub maneuvering_speed: BigDecimal,
    #[validate(custom(function = "validate_speed"))]
    pub cruise_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vx_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vy_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vs0_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vg_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vfe_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vno_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vne_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vlo_speed: Option<BigDecimal>,
    #[validate(custom(function = "validate_speed"))]
    pub vle_speed: Option<BigDecimal>,
    #[validate(range(min = 0, max = MAX_TAKEOFF_WEIGHT_LBS))]
    pub max_takeoff_weight: Option<i32>,
    #[serde(default = "default_seating_capacity")]
    #[validate(range(min = MIN_SEATS, max = MAX_SEATS))]
    pub seating_capacity: i32,
    #[serde(default)]
    pub retractable_gear: bool,
    #[serde(default)]
    pub variable_pitch_prop: bool,
    pub certification_date: Option<NaiveDate>,
    #[serde(default)]
    pub verification_source: String,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    /// Replaces the engine set when present; absent keeps it unchanged.
    #[serde(default, rename = "engines")]
    pub engine_ids: Option<Vec<DbId>>,
}

impl AircraftInput {
    /// Flags this input would persist with.
    pub fn classify(&self) -> Eligibility {
        eligibility::classify(&self.clean_stall_speed, self.certification_date)
    }

    /// Full input reproducing `current`, leaving the engine set untouched.
    pub fn from_row(current: &Aircraft) -> Self {
        Self {
            manufacturer_id: current.manufacturer_id,
            model: current.model.clone(),
            clean_stall_speed: current.clean_stall_speed.clone(),
            top_speed: current.top_speed.clone(),
            maneuvering_speed: current.maneuvering_speed.clone(),
            cruise_speed: current.cruise_speed.clone(),
            vx_speed: current.vx_speed.clone(),
            vy_speed: current.vy_speed.clone(),
            vs0_speed: current.vs0_speed.clone(),
            vg_speed: current.vg_speed.clone(),
            vfe_speed: current.vfe_speed.clone(),
            vno_speed: current.vno_speed.clone(),
            vne_speed: current.vne_speed.clone(),
            vlo_speed: current.vlo_speed.clone(),
            vle_speed: current.vle_speed.clone(),
            max_takeoff_weight: current.max_takeoff_weight,
            seating_capacity: current.seating_capacity,
            retractable_gear: current.retractable_gear,
            variable_pitch_prop: current.variable_pitch_prop,
            certification_date: current.certification_date,
            verification_source: current.verification_source.clone(),
            image: current.image.clone(),
            engine_ids: None,
        }
    }
}

/// DTO for a partial update. Absent fields keep their current value;
/// `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
pub struct AircraftPatch {
    #[serde(rename = "manufacturer")]
    pub manufacturer_id: Option<DbId>,
    pub model: Option<String>,
    pub clean_stall_speed: Option<BigDecimal>,
    pub top_speed: Option<BigDecimal>,
    pub maneuvering_speed: Option<BigDecimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub cruise_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vx_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vy_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vs0_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vg_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vfe_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vno_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vne_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vlo_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub vle_speed: Option<Option<BigDecimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_takeoff_weight: Option<Option<i32>>,
    pub seating_capacity: Option<i32>,
    pub retractable_gear: Option<bool>,
    pub variable_pitch_prop: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub certification_date: Option<Option<NaiveDate>>,
    pub verification_source: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(rename = "engines")]
    pub engine_ids: Option<Vec<DbId>>,
}

impl AircraftPatch {
    pub fn merge(self, current: &Aircraft) -> AircraftInput {
        let base = AircraftInput::from_row(current);
        AircraftInput {
            manufacturer_id: self.manufacturer_id.unwrap_or(base.manufacturer_id),
            model: self.model.unwrap_or(base.model),
            clean_stall_speed: self.clean_stall_speed.unwrap_or(base.clean_stall_speed),
            top_speed: self.top_speed.unwrap_or(base.top_speed),
            maneuvering_speed: self.maneuvering_speed.unwrap_or(base.maneuvering_speed),
            cruise_speed: merge_nullable(self.cruise_speed, base.cruise_speed),
            vx_speed: merge_nullable(self.vx_speed, base.vx_speed),
            vy_speed: merge_nullable(self.vy_speed, base.vy_speed),
            vs0_speed: merge_nullable(self.vs0_speed, base.vs0_speed),
            vg_speed: merge_nullable(self.vg_speed, base.vg_speed),
            vfe_speed: merge_nullable(self.vfe_speed, base.vfe_speed),
            vno_speed: merge_nullable(self.vno_speed, base.vno_speed),
            vne_speed: merge_nullable(self.vne_speed, base.vne_speed),
            vlo_speed: merge_nullable(self.vlo_speed, base.vlo_speed),
            vle_speed: merge_nullable(self.vle_speed, base.vle_speed),
            max_takeoff_weight: merge_nullable(self.max_takeoff_weight, base.max_takeoff_weight),
            seating_capacity: self.seating_capacity.unwrap_or(base.seating_capacity),
            retractable_gear: self.retractable_gear.unwrap_or(base.retractable_gear),
            variable_pitch_prop: self.variable_pitch_prop.unwrap_or(base.variable_pitch_prop),
            certification_date: merge_nullable(self.certification_date, base.certification_date),
            verification_source: self
                .verification_source
                .unwrap_or(base.verification_source),
            image: merge_nullable(self.image, base.image),
            engine_ids: self.engine_ids,
        }
    }
}

/// List filters for `GET /aircraft/`. `None` means "do not filter".
#[derive(Debug, Default, Clone)]
pub struct AircraftFilter {
    pub manufacturer_id: Option<DbId>,
    pub is_mosaic_compliant: Option<bool>,
    pub sport_pilot_eligible: Option<bool>,
    pub seating_capacity: Option<i32>,
    pub retractable_gear: Option<bool>,
    pub variable_pitch_prop: Option<bool>,
    pub certification_date: Option<NaiveDate>,
    pub manufacturer_is_currently_manufacturing: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

// ---------------------------------------------------------------------------
// Response views
// ---------------------------------------------------------------------------

/// Computed fields carried by every aircraft representation.
#[derive(Debug, Clone, Serialize)]
pub struct AircraftExtras {
    pub engines: Vec<Engine>,
    pub eligibility_badges: Vec<&'static str>,
    pub performance_category: &'static str,
    pub speed_range: &'static str,
}

impl AircraftExtras {
    fn new(aircraft: &Aircraft, engines: Vec<Engine>) -> Self {
        Self {
            engines,
            eligibility_badges: eligibility::eligibility_badges(
                aircraft.eligibility(),
                aircraft.retractable_gear,
                aircraft.variable_pitch_prop,
            ),
            performance_category: eligibility::performance_category(&aircraft.top_speed),
            speed_range: eligibility::speed_range(
                &aircraft.clean_stall_speed,
                &aircraft.top_speed,
            ),
        }
    }
}

/// List-shaped aircraft: manufacturer as a bare id.
#[derive(Debug, Clone, Serialize)]
pub struct AircraftView {
    pub manufacturer: DbId,
    #[serde(flatten)]
    pub aircraft: Aircraft,
    #[serde(flatten)]
    pub extras: AircraftExtras,
}

impl AircraftView {
    pub fn new(aircraft: Aircraft, engines: Vec<Engine>) -> Self {
        let extras = AircraftExtras::new(&aircraft, engines);
        Self {
            manufacturer: aircraft.manufacturer_id,
            aircraft,
            extras,
        }
    }
}

/// Detail-shaped aircraft: nested manufacturer plus the MOSAIC analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AircraftDetailView {
    pub manufacturer: Manufacturer,
    #[serde(flatten)]
    pub aircraft: Aircraft,
    #[serde(flatten)]
    pub extras: AircraftExtras,
    pub mosaic_analysis: MosaicAnalysis,
}

impl AircraftDetailView {
    pub fn new(aircraft: Aircraft, manufacturer: Manufacturer, engines: Vec<Engine>) -> Self {
        let extras = AircraftExtras::new(&aircraft, engines);
        let mosaic_analysis = MosaicAnalysis::new(
            aircraft.eligibility(),
            &aircraft.clean_stall_speed,
            aircraft.certification_date,
            aircraft.retractable_gear,
            aircraft.variable_pitch_prop,
        );
        Self {
            manufacturer,
            aircraft,
            extras,
            mosaic_analysis,
        }
    }
}
