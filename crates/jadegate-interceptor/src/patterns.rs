//! The fixed dangerous-pattern regex set scanned over every tool call's
//! parameter strings.
//!
//! First-class configuration data, not code, per the design note in
//! `SPEC_FULL.md`: a deployment that needs a different pattern only edits
//! this slice, it never touches the scan logic in [`crate::scan`].

use std::sync::LazyLock;

use regex::Regex;

/// Source text of every dangerous pattern, matched case-insensitively.
/// Kept alongside the compiled set so a denial reason can cite the exact
/// pattern that fired.
const DANGEROUS_PATTERN_SOURCES: &[&str] = &[
    r"\brm\s+-rf\b",
    r"\bmkfs\b",
    r"\bdd\s+if=",
    r"\bchmod\s+777\b",
    r"\beval\s*\(",
    r"\bexec\s*\(",
    r"\b__import__\s*\(",
    r"\bos\.system\s*\(",
    r"\bsubprocess\b",
    r"curl\s+.*\|\s*(?:ba)?sh",
    r"wget\s+.*\|\s*(?:ba)?sh",
    r">\s*/dev/sda",
    r"\bshutdown\b",
    r"\breboot\b",
    r"\bkillall\b",
];

/// Compiled, case-insensitive dangerous-pattern regexes, in declaration
/// order, paired with their source text.
pub static DANGEROUS_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    DANGEROUS_PATTERN_SOURCES
        .iter()
        .map(|src| {
            let compiled = Regex::new(&format!("(?i){src}"))
                .unwrap_or_else(|e| panic!("invalid built-in dangerous pattern {src:?}: {e}"));
            (compiled, *src)
        })
        .collect()
});

/// Return the source text of the first dangerous pattern matching `text`,
/// if any.
#[must_use]
pub fn first_dangerous_match(text: &str) -> Option<&'static str> {
    DANGEROUS_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, src)| *src)
}
