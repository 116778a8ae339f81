//! Field validators shared by the write DTOs.
//!
//! These plug into `#[validate(custom(function = ...))]` attributes and
//! mirror the `NUMERIC(p, s)` column definitions plus the range checks in
//! the migrations, so a value that passes here also fits the column.

use std::borrow::Cow;

use bigdecimal::BigDecimal;
use validator::ValidationError;

use crate::eligibility::MOSAIC_MAX_STALL_KNOTS;

/// Upper bound for every speed other than the clean stall speed (knots).
pub const MAX_SPEED_KNOTS: i64 = 999;

/// Inclusive seating bounds for a light-sport aircraft.
pub const MIN_SEATS: i32 = 1;
pub const MAX_SEATS: i32 = 4;

/// Inclusive horsepower bounds for a catalog engine.
pub const MIN_HORSEPOWER: i32 = 50;
pub const MAX_HORSEPOWER: i32 = 400;

/// Upper bound for maximum takeoff weight (pounds).
pub const MAX_TAKEOFF_WEIGHT_LBS: i32 = 99_999;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Whether `value` fits a `NUMERIC(precision, scale)` column without rounding.
pub fn fits_numeric(value: &BigDecimal, precision: u32, scale: i64) -> bool {
    let (_, exponent) = value.normalized().as_bigint_and_exponent();
    if exponent > scale {
        return false;
    }
    let limit = BigDecimal::from(10_i64.pow(precision - scale as u32));
    value.abs() < limit
}

fn check_knots(value: &BigDecimal, max: i64) -> Result<(), ValidationError> {
    if !fits_numeric(value, 5, 1) {
        return Err(error(
            "decimal_places",
            "Ensure there are no more than 1 decimal place.",
        ));
    }
    if *value < BigDecimal::from(0) {
        return Err(error(
            "range",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if *value > BigDecimal::from(max) {
        return Err(error("range", "Value exceeds the allowed maximum."));
    }
    Ok(())
}

/// Clean stall speed: 0 to 61 knots, one decimal place.
pub fn validate_stall_speed(value: &BigDecimal) -> Result<(), ValidationError> {
    check_knots(value, MOSAIC_MAX_STALL_KNOTS).map_err(|e| {
        if e.code == "range" {
            error(
                "range",
                "Clean stall speed must be between 0 and 61 knots (MOSAIC LSA limit).",
            )
        } else {
            e
        }
    })
}

/// Any other V-speed or performance speed: 0 to 999 knots, one decimal place.
pub fn validate_speed(value: &BigDecimal) -> Result<(), ValidationError> {
    check_knots(value, MAX_SPEED_KNOTS)
}

/// Engine displacement in liters: at most 4 digits with 2 decimal places.
pub fn validate_displacement(value: &BigDecimal) -> Result<(), ValidationError> {
    if !fits_numeric(value, 4, 2) {
        return Err(error(
            "decimal_places",
            "Ensure there are no more than 4 digits in total and 2 decimal places.",
        ));
    }
    if *value <= BigDecimal::from(0) {
        return Err(error("range", "Displacement must be positive."));
    }
    Ok(())
}

/// Non-blank after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "This field may not be blank."));
    }
    Ok(())
}
