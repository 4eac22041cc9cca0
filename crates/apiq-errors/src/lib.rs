pub mod codes;
pub mod model;
pub mod prelude;

pub use model::{ErrorBuilder, ErrorObj};
