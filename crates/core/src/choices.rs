//! Closed choice enums stored as `TEXT` columns.
//!
//! Each enum maps one-to-one onto the string stored in the database and sent
//! over the wire, and carries a human-readable label for display fields.
//! Unknown strings are rejected at the edge (deserialization, row decoding,
//! CLI argument parsing) so the rest of the code can match exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Returned when a string does not name any variant of a choice enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}. Expected one of: {expected}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! define_choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($value:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stored / wire representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $value ),+
                }
            }

            /// Human-readable display label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok($name::$variant), )+
                    _ => Err(UnknownChoice {
                        kind: stringify!($name),
                        value: s.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|v| v.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownChoice;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

define_choice_enum! {
    /// Fuel an engine burns.
    FuelType {
        Avgas => ("AVGAS", "Avgas (100LL/91UL)"),
        Mogas => ("MOGAS", "Automotive gasoline (91+ octane)"),
        Diesel => ("DIESEL", "Jet A / Diesel"),
        Electric => ("ELECTRIC", "Electric"),
    }
}

define_choice_enum! {
    /// Powerplant family.
    EngineType {
        Piston => ("PISTON", "Piston engine"),
        Turboprop => ("TURBOPROP", "Turboprop"),
        Electric => ("ELECTRIC", "Electric motor"),
    }
}

define_choice_enum! {
    /// Aircraft attribute a correction may target.
    CorrectionField {
        CleanStallSpeed => ("clean_stall_speed", "Clean stall speed"),
        TopSpeed => ("top_speed", "Top speed"),
        ManeuveringSpeed => ("maneuvering_speed", "Maneuvering speed"),
        CruiseSpeed => ("cruise_speed", "Cruise speed"),
        VxSpeed => ("vx_speed", "Best angle of climb speed (Vx)"),
        VySpeed => ("vy_speed", "Best rate of climb speed (Vy)"),
        Vs0Speed => ("vs0_speed", "Stall speed landing configuration (Vs0)"),
        VgSpeed => ("vg_speed", "Best glide speed (Vg)"),
        VfeSpeed => ("vfe_speed", "Maximum flap extended speed (Vfe)"),
        VnoSpeed => ("vno_speed", "Maximum structural cruising speed (Vno)"),
        VneSpeed => ("vne_speed", "Never exceed speed (Vne)"),
        MaxTakeoffWeight => ("max_takeoff_weight", "Maximum takeoff weight"),
        SeatingCapacity => ("seating_capacity", "Seating capacity"),
        RetractableGear => ("retractable_gear", "Retractable gear"),
        VariablePitchProp => ("variable_pitch_prop", "Variable pitch propeller"),
        CertificationDate => ("certification_date", "Certification date"),
        VerificationSource => ("verification_source", "Verification source"),
        Engines => ("engines", "Engine configurations"),
        General => ("general", "General information"),
    }
}

define_choice_enum! {
    /// Review state of a user-submitted correction.
    CorrectionStatus {
        Pending => ("PENDING", "Pending review"),
        Approved => ("APPROVED", "Approved"),
        Rejected => ("REJECTED", "Rejected"),
        Implemented => ("IMPLEMENTED", "Implemented"),
    }
}

define_choice_enum! {
    /// Runtime feature switches.
    FeatureKey {
        AdsEnabled => ("ads_enabled", "Google AdSense Ads"),
        AmpAdsEnabled => ("amp_ads_enabled", "AMP Ads"),
        AnalyticsEnabled => ("analytics_enabled", "Google Analytics"),
        BetaFeatures => ("beta_features", "Beta Features"),
        MaintenanceMode => ("maintenance_mode", "Maintenance Mode"),
    }
}

impl Default for FuelType {
    fn default() -> Self {
        FuelType::Avgas
    }
}

impl Default for EngineType {
    fn default() -> Self {
        EngineType::Piston
    }
}

impl Default for CorrectionStatus {
    fn default() -> Self {
        CorrectionStatus::Pending
    }
}
