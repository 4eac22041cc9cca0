pub mod errors;
pub mod keygen;
pub mod memory;
pub mod model;
pub mod prelude;
pub mod spi;

pub use errors::StorageError;
