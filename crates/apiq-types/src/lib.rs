pub mod id;
pub mod prelude;
pub mod time;
pub mod validate;
pub mod verdict;
