pub use crate::analytics::{Analytics, MonthBuckets, MonthlyUsage, DEFAULT_WINDOW_MONTHS};
pub use crate::errors::MeterError;
pub use crate::meter::UsageMeter;
