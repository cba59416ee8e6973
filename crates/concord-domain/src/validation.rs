//! SQL identifier validation
//!
//! Table and column names cannot be bound as statement parameters, so every
//! name that reaches a SQL string goes through [`validate_identifier`] first.
//!
//! # Examples
//!
//! ```rust
//! use concord_domain::validation::is_valid_identifier;
//!
//! assert!(is_valid_identifier("user_profile.name"));
//! assert!(!is_valid_identifier("users; DROP TABLE x"));
//! assert!(!is_valid_identifier("1bad"));
//! ```

use crate::constants::{IDENTIFIER_KEYWORD_BLACKLIST, IDENTIFIER_MAX_LENGTH};
use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is a valid regex")
});

/// Check whether `candidate` is safe to interpolate as a table or column name
///
/// Accepts one or more `.`-separated segments matching
/// `^[A-Za-z_][A-Za-z0-9_]*$`, at most [`IDENTIFIER_MAX_LENGTH`] bytes in
/// total, none of which is a blacklisted statement keyword.
pub fn is_valid_identifier(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > IDENTIFIER_MAX_LENGTH {
        return false;
    }

    candidate.split('.').all(|segment| {
        IDENTIFIER_SEGMENT.is_match(segment) && !is_blacklisted_keyword(segment)
    })
}

/// Validate an identifier, returning [`Error::InvalidIdentifier`] on rejection
pub fn validate_identifier(candidate: &str) -> Result<&str> {
    if is_valid_identifier(candidate) {
        Ok(candidate)
    } else {
        Err(Error::invalid_identifier(candidate))
    }
}

/// Validate every identifier in `candidates`, failing on the first rejection
pub fn validate_identifiers<'a, I>(candidates: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for candidate in candidates {
        validate_identifier(candidate)?;
    }
    Ok(())
}

fn is_blacklisted_keyword(segment: &str) -> bool {
    IDENTIFIER_KEYWORD_BLACKLIST
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(segment))
}
