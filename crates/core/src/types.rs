//! Primitive aliases shared by every crate in the workspace.

/// Primary key type for all entity tables (`BIGSERIAL`).
pub type DbId = i64;

/// Timestamp type for `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Decimal type for `NUMERIC` columns (speeds in knots, displacement).
pub type Decimal = bigdecimal::BigDecimal;

/// Decimal places of every knots column (`NUMERIC(5, 1)`).
pub const KNOTS_SCALE: i64 = 1;

/// `value` at the knots column scale, so `48` renders as `48.0`.
pub fn knots_at_scale(value: &Decimal) -> Decimal {
    value.with_scale(KNOTS_SCALE)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn knots_render_with_one_decimal_place() {
        let whole = Decimal::from(48);
        assert_eq!(knots_at_scale(&whole).to_string(), "48.0");

        let fractional = Decimal::from_str("59.5").unwrap();
        assert_eq!(knots_at_scale(&fractional).to_string(), "59.5");
    }
}
