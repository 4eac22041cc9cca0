pub use crate::id::Id;
pub use crate::time::Timestamp;
pub use crate::validate::is_valid_project_number;
pub use crate::verdict::Verdict;
