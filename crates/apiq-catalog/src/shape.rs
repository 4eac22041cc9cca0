use serde::{Deserialize, Serialize};

/// Expected reply layout for a classification call. The shape drives
/// both the instruction sent upstream and how the raw reply is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Exactly one token, PASS or FAIL. Silver tier.
    SingleToken,
    /// Verdict on line one, reason on line two. Gold tier.
    TokenPlusReason,
    /// "PASS: ..." / "FAIL: ..." free text with an UNKNOWN fallback.
    /// Anonymous tier only.
    Prefixed,
}
