use apiq_types::prelude::Verdict;

use crate::shape::ResponseShape;

/// Shortest reply that can still carry a "PASS"/"FAIL" prefix plus a
/// separator; anything at or under this falls through to UNKNOWN.
const MIN_PREFIXED_LEN: usize = 5;

const NO_REASON: &str = "no detailed reason provided";
const INVALID_FORMAT: &str = "invalid response format";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub verdict: Verdict,
    pub reason: Option<String>,
}

/// Parse the raw model reply into a typed verdict according to the
/// shape the invoking check declared. Pure and panic-free: every
/// substring operation is bounds-checked first.
pub fn normalize(raw: &str, shape: ResponseShape) -> Normalized {
    match shape {
        ResponseShape::SingleToken => Normalized {
            verdict: Verdict::from_token(raw),
            reason: None,
        },
        ResponseShape::TokenPlusReason => normalize_token_plus_reason(raw),
        ResponseShape::Prefixed => normalize_prefixed(raw),
    }
}

fn normalize_token_plus_reason(raw: &str) -> Normalized {
    let text = raw.trim();
    if text.is_empty() {
        return Normalized {
            verdict: Verdict::Fail,
            reason: Some(INVALID_FORMAT.to_string()),
        };
    }

    match text.split_once('\n') {
        Some((token, rest)) => {
            let reason = rest.trim();
            Normalized {
                verdict: Verdict::from_token(token),
                reason: Some(if reason.is_empty() {
                    NO_REASON.to_string()
                } else {
                    reason.to_string()
                }),
            }
        }
        None => Normalized {
            verdict: Verdict::from_token(text),
            reason: Some(NO_REASON.to_string()),
        },
    }
}

fn normalize_prefixed(raw: &str) -> Normalized {
    let text = raw.trim();
    if text.len() > MIN_PREFIXED_LEN {
        if let Some(token) = text.get(..4) {
            if token.eq_ignore_ascii_case("PASS") || token.eq_ignore_ascii_case("FAIL") {
                let verdict = if token.eq_ignore_ascii_case("PASS") {
                    Verdict::Pass
                } else {
                    Verdict::Fail
                };
                let reason = text[4..]
                    .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());
                return Normalized {
                    verdict,
                    reason: Some(reason.to_string()),
                };
            }
        }
    }

    // No recognizable prefix: keep the entire reply verbatim. This is
    // the one shape that preserves a non-binary outcome.
    Normalized {
        verdict: Verdict::Unknown,
        reason: Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(raw: &str) -> Verdict {
        normalize(raw, ResponseShape::SingleToken).verdict
    }

    #[test]
    fn single_token_pass_is_exact_and_case_insensitive() {
        assert_eq!(single("PASS"), Verdict::Pass);
        assert_eq!(single("  pass\n"), Verdict::Pass);
        assert_eq!(single("Pass"), Verdict::Pass);
    }

    #[test]
    fn single_token_everything_else_fails() {
        assert_eq!(single(""), Verdict::Fail);
        assert_eq!(single("pass please"), Verdict::Fail);
        assert_eq!(single("FAIL: x"), Verdict::Fail);
        assert_eq!(single("PASSED"), Verdict::Fail);
    }

    #[test]
    fn two_lines_split_into_verdict_and_reason() {
        let n = normalize("PASS\nHose connected", ResponseShape::TokenPlusReason);
        assert_eq!(n.verdict, Verdict::Pass);
        assert_eq!(n.reason.as_deref(), Some("Hose connected"));

        let n = normalize("fail\n  hose dangling  ", ResponseShape::TokenPlusReason);
        assert_eq!(n.verdict, Verdict::Fail);
        assert_eq!(n.reason.as_deref(), Some("hose dangling"));
    }

    #[test]
    fn one_line_gets_placeholder_reason() {
        let n = normalize("PASS", ResponseShape::TokenPlusReason);
        assert_eq!(n.verdict, Verdict::Pass);
        assert_eq!(n.reason.as_deref(), Some("no detailed reason provided"));
    }

    #[test]
    fn empty_reply_is_invalid_format() {
        let n = normalize("   \n ", ResponseShape::TokenPlusReason);
        assert_eq!(n.verdict, Verdict::Fail);
        assert_eq!(n.reason.as_deref(), Some("invalid response format"));
    }

    #[test]
    fn trailing_newline_counts_as_one_line() {
        let n = normalize("PASS\n", ResponseShape::TokenPlusReason);
        assert_eq!(n.verdict, Verdict::Pass);
        assert_eq!(n.reason.as_deref(), Some("no detailed reason provided"));
    }

    #[test]
    fn prefixed_pass_and_fail_strip_separator() {
        let n = normalize("PASS: hose attached", ResponseShape::Prefixed);
        assert_eq!(n.verdict, Verdict::Pass);
        assert_eq!(n.reason.as_deref(), Some("hose attached"));

        let n = normalize("FAIL - tap closed", ResponseShape::Prefixed);
        assert_eq!(n.verdict, Verdict::Fail);
        assert_eq!(n.reason.as_deref(), Some("tap closed"));
    }

    #[test]
    fn prefixed_keeps_unparseable_text_verbatim() {
        let n = normalize("I cannot tell from this photo.", ResponseShape::Prefixed);
        assert_eq!(n.verdict, Verdict::Unknown);
        assert_eq!(n.reason.as_deref(), Some("I cannot tell from this photo."));
    }

    #[test]
    fn prefixed_short_replies_never_slice() {
        for raw in ["", "P", "PASS", "PASS:", "FAIL!", "ok"] {
            let n = normalize(raw, ResponseShape::Prefixed);
            assert_eq!(n.verdict, Verdict::Unknown, "raw={raw:?}");
            assert_eq!(n.reason.as_deref(), Some(raw));
        }
    }

    #[test]
    fn prefixed_fallback_keeps_surrounding_whitespace() {
        let n = normalize("  unclear photo, retake it \n", ResponseShape::Prefixed);
        assert_eq!(n.verdict, Verdict::Unknown);
        assert_eq!(n.reason.as_deref(), Some("  unclear photo, retake it \n"));
    }

    #[test]
    fn prefixed_survives_multibyte_input() {
        // A multibyte char straddling the prefix boundary must not panic.
        let n = normalize("PAS\u{00df} and more", ResponseShape::Prefixed);
        assert_eq!(n.verdict, Verdict::Unknown);
    }
}
