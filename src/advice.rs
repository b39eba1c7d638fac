// Best-effort extraction of the `advice` field from a loosely-structured
// response string.
//
// Backend replies embed the advice text in a pseudo-JSON fragment such as
// `'advice': 'text with \n escapes'` (single- or double-quoted, not
// necessarily valid JSON), so this module pattern-matches instead of
// parsing. Callers must treat the output as display text, never as
// validated data: when the pattern does not match, the input is returned
// verbatim rather than failing.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Matches the first `advice` key followed by a colon and a quoted value.
/// Opening and closing quotes must be the same character; since the regex
/// crate has no backreferences, the two quote styles are spelled out as
/// separate alternatives. The closing quote must be followed by `,`, `}`,
/// or end of input. The value is matched lazily, so it stops at the first
/// closing quote that satisfies the terminator.
const ADVICE_PATTERN: &str = concat!(
    r#"['"]advice['"]\s*:\s*"#,
    r#"(?:'((?s:.)*?)'(?:[,}]|$)|"((?s:.)*?)"(?:[,}]|$))"#,
);

fn advice_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ADVICE_PATTERN).expect("advice pattern is valid"))
}

/// Extract the advice text from a raw response string.
///
/// On a match, returns the captured value with literal `\n` two-character
/// escape sequences replaced by real newlines. An empty captured value is
/// returned as an empty string, not the fallback. On no match, returns the
/// whole input unchanged.
///
/// Known limitation: a value containing its own delimiter quote followed
/// by `,` or `}` is truncated at that quote (lazy match).
pub fn extract_advice(raw: &str) -> Cow<'_, str> {
    match advice_regex().captures(raw) {
        Some(caps) => {
            let value = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or("");
            Cow::Owned(value.replace("\\n", "\n"))
        }
        None => Cow::Borrowed(raw),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
