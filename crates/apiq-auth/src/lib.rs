pub mod admin;
pub mod apikey;
pub mod errors;
pub mod prelude;
