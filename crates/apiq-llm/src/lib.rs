pub mod errors;
pub mod mime;
pub mod prelude;
pub mod vision;
