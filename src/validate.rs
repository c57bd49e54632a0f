//! Composable validation rules shared by every tool handler.
//!
//! Each rule appends at most one violation per field; a tool's argument struct
//! applies its per-field rule lists and collects violations across all fields
//! so a single response can report every problem at once. Nothing here touches
//! the network: validation always runs before any client call.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Default page size applied by the argument-decoding layer when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 15;

pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// One failed rule: the offending field and what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Render a violation list as a single human-readable line.
pub fn describe(violations: &[Violation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    format!("invalid arguments: {}", parts.join("; "))
}

fn repository_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._-]+/[A-Za-z0-9._-]+$").expect("repository pattern compiles")
    })
}

/// Repository path: exactly one `/`, restricted character set in each segment.
pub fn repository(out: &mut Vec<Violation>, field: &'static str, value: &str) {
    if !repository_re().is_match(value) {
        out.push(Violation {
            field,
            message: "must be in \"owner/repo\" format".to_string(),
        });
    }
}

/// Issue numbers, PR numbers, comment ids: integers >= 1.
pub fn positive(out: &mut Vec<Violation>, field: &'static str, value: i64) {
    if value < 1 {
        out.push(Violation {
            field,
            message: "must be a positive integer".to_string(),
        });
    }
}

/// Comment bodies and new content: non-empty after trimming whitespace.
pub fn non_blank(out: &mut Vec<Violation>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        out.push(Violation {
            field,
            message: "must not be blank".to_string(),
        });
    }
}

/// Pagination page size, inclusive bounds.
pub fn limit(out: &mut Vec<Violation>, field: &'static str, value: i64) {
    if !(MIN_LIMIT..=MAX_LIMIT).contains(&value) {
        out.push(Violation {
            field,
            message: format!("must be between {} and {}", MIN_LIMIT, MAX_LIMIT),
        });
    }
}

/// Pagination offset, zero-based.
pub fn offset(out: &mut Vec<Violation>, field: &'static str, value: i64) {
    if value < 0 {
        out.push(Violation {
            field,
            message: "must be zero or greater".to_string(),
        });
    }
}

/// Closed enums such as PR state; the message names the allowed values.
pub fn one_of(out: &mut Vec<Violation>, field: &'static str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        out.push(Violation {
            field,
            message: format!("must be one of: {}", allowed.join(", ")),
        });
    }
}
