//! MOSAIC eligibility classification and read-side derivations.
//!
//! [`classify`] is the only rule that mutates stored state: every aircraft
//! write path calls it and persists the result alongside the stall speed.
//! The remaining functions compute presentation values from an already
//! classified record and are never stored.

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Highest clean stall speed (knots CAS) a sport pilot may operate.
pub const SPORT_PILOT_MAX_STALL_KNOTS: i64 = 59;

/// Highest clean stall speed (knots CAS) for a MOSAIC light-sport aircraft.
pub const MOSAIC_MAX_STALL_KNOTS: i64 = 61;

/// Date the MOSAIC certification rule takes effect, as `(year, month, day)`.
pub const MOSAIC_EFFECTIVE_DATE: (i32, u32, u32) = (2026, 7, 24);

fn knots(value: i64) -> BigDecimal {
    BigDecimal::from(value)
}

/// Whether `date` falls on or after [`MOSAIC_EFFECTIVE_DATE`].
pub fn certified_under_mosaic(date: NaiveDate) -> bool {
    (date.year(), date.month(), date.day()) >= MOSAIC_EFFECTIVE_DATE
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The two derived flags persisted on every aircraft row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub sport_pilot_eligible: bool,
    pub mosaic_compliant: bool,
}

impl Default for Eligibility {
    /// Flags a record carries before any stall speed has been classified.
    fn default() -> Self {
        Self {
            sport_pilot_eligible: true,
            mosaic_compliant: true,
        }
    }
}

impl Eligibility {
    /// Recompute from `stall_speed`, keeping the current flags when it is absent.
    pub fn reclassify(self, stall_speed: Option<&BigDecimal>, certified: Option<NaiveDate>) -> Self {
        match stall_speed {
            Some(stall) => classify(stall, certified),
            None => self,
        }
    }
}

/// Derive both eligibility flags from a clean stall speed.
///
/// The certification date selects between the post-rule and legacy branches,
/// which currently apply the same stall-speed ceiling.
pub fn classify(stall_speed: &BigDecimal, certified: Option<NaiveDate>) -> Eligibility {
    let sport_pilot_eligible = *stall_speed <= knots(SPORT_PILOT_MAX_STALL_KNOTS);
    let meets_stall_speed = *stall_speed <= knots(MOSAIC_MAX_STALL_KNOTS);

    let mosaic_compliant = match certified {
        Some(date) if certified_under_mosaic(date) => meets_stall_speed,
        Some(_) => meets_stall_speed,
        None => meets_stall_speed,
    };

    Eligibility {
        sport_pilot_eligible,
        mosaic_compliant,
    }
}

// ---------------------------------------------------------------------------
// Presentation values
// ---------------------------------------------------------------------------

pub const BADGE_SPORT_PILOT: &str = "Sport Pilot";
pub const BADGE_PRIVATE_PILOT: &str = "Private Pilot";
pub const BADGE_MOSAIC_ELIGIBLE: &str = "MOSAIC Eligible";
pub const BADGE_NOT_MOSAIC_ELIGIBLE: &str = "Not MOSAIC Eligible";
pub const BADGE_RETRACTABLE_GEAR: &str = "RG";
pub const BADGE_VARIABLE_PITCH: &str = "VP";

/// Ordered badge list shown on every aircraft representation.
pub fn eligibility_badges(
    eligibility: Eligibility,
    retractable_gear: bool,
    variable_pitch_prop: bool,
) -> Vec<&'static str> {
    let mut badges = Vec::with_capacity(4);

    if eligibility.sport_pilot_eligible {
        badges.push(BADGE_SPORT_PILOT);
    } else if eligibility.mosaic_compliant {
        badges.push(BADGE_PRIVATE_PILOT);
    }

    if eligibility.mosaic_compliant {
        badges.push(BADGE_MOSAIC_ELIGIBLE);
    } else {
        badges.push(BADGE_NOT_MOSAIC_ELIGIBLE);
    }

    if retractable_gear {
        badges.push(BADGE_RETRACTABLE_GEAR);
    }
    if variable_pitch_prop {
        badges.push(BADGE_VARIABLE_PITCH);
    }

    badges
}

/// Coarse label from top speed alone.
pub fn performance_category(top_speed: &BigDecimal) -> &'static str {
    if *top_speed >= knots(200) {
        "High Performance"
    } else if *top_speed >= knots(140) {
        "Cross Country"
    } else {
        "Standard Performance"
    }
}

/// `(max stall, max top, label)` rows checked in order; the first row both
/// speeds fit under wins.
const SPEED_RANGES: &[(i64, i64, &str)] = &[
    (45, 120, "Trainer"),
    (55, 150, "Sport"),
    (65, 180, "Touring"),
];

/// Coarse label from the stall/top speed pair.
pub fn speed_range(stall_speed: &BigDecimal, top_speed: &BigDecimal) -> &'static str {
    SPEED_RANGES
        .iter()
        .find(|(max_stall, max_top, _)| {
            *stall_speed <= knots(*max_stall) && *top_speed <= knots(*max_top)
        })
        .map(|(_, _, label)| *label)
        .unwrap_or("High Performance")
}

/// Which side of the rule's effective date an aircraft was certified on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CertificationEra {
    Legacy,
    New,
    Unknown,
}

impl CertificationEra {
    pub fn from_date(certified: Option<NaiveDate>) -> Self {
        match certified {
            Some(date) if certified_under_mosaic(date) => CertificationEra::New,
            Some(_) => CertificationEra::Legacy,
            None => CertificationEra::Unknown,
        }
    }
}

/// Summary block included on the detail representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MosaicAnalysis {
    pub lsa_eligible: bool,
    pub sport_pilot_eligible: bool,
    pub certification_era: CertificationEra,
    pub stall_speed_status: &'static str,
    pub endorsements_required: bool,
    pub passenger_limitation: Option<&'static str>,
}

impl MosaicAnalysis {
    pub fn new(
        eligibility: Eligibility,
        stall_speed: &BigDecimal,
        certified: Option<NaiveDate>,
        retractable_gear: bool,
        variable_pitch_prop: bool,
    ) -> Self {
        let stall_speed_status = if *stall_speed <= knots(MOSAIC_MAX_STALL_KNOTS) {
            "Within LSA limits"
        } else {
            "Exceeds LSA limits"
        };

        Self {
            lsa_eligible: eligibility.mosaic_compliant,
            sport_pilot_eligible: eligibility.sport_pilot_eligible,
            certification_era: CertificationEra::from_date(certified),
            stall_speed_status,
            endorsements_required: retractable_gear || variable_pitch_prop,
            passenger_limitation: eligibility
                .sport_pilot_eligible
                .then_some("Sport pilot limited to 1 passenger"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
