pub mod analytics;
pub mod errors;
pub mod meter;
pub mod prelude;
