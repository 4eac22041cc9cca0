use serde::{Deserialize, Serialize};

/// Normalized classification outcome. `Unknown` is reachable only from
/// the free-form anonymous route; the tiered routes fail closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
    Unknown,
}

impl Verdict {
    /// Fail-closed token mapping: anything that is not exactly "PASS"
    /// (case-insensitive, trimmed) is a FAIL.
    pub fn from_token(token: &str) -> Self {
        if token.trim().eq_ignore_ascii_case("PASS") {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}
