//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement writes that must
//! also run inside a caller's transaction take `&mut PgConnection` instead.

pub mod aircraft_repo;
pub mod correction_repo;
pub mod engine_repo;
pub mod feature_flag_repo;
pub mod manufacturer_repo;

pub use aircraft_repo::AircraftRepo;
pub use correction_repo::CorrectionRepo;
pub use engine_repo::EngineRepo;
pub use feature_flag_repo::{FeatureFlagRepo, FlagUpdate, InitOutcome};
pub use manufacturer_repo::ManufacturerRepo;
