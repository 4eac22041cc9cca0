pub mod checks;
pub mod normalize;
pub mod prelude;
pub mod shape;
