pub use crate::checks::{Catalog, CheckDefinition};
pub use crate::normalize::{normalize, Normalized};
pub use crate::shape::ResponseShape;
