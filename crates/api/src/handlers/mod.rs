pub mod admin;
pub mod aircraft;
pub mod corrections;
pub mod docs;
pub mod engines;
pub mod feature_flags;
pub mod manufacturers;
