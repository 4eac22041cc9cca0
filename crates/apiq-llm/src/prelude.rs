pub use crate::errors::LlmError;
pub use crate::mime::infer_mime;
pub use crate::vision::{Classifier, VisionClassifier, VisionConfig};
