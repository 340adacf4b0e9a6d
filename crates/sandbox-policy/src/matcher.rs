//! Path and domain pattern matching.
//!
//! Patterns are pre-classified into a tagged variant ([`PathPattern`] /
//! [`DomainPattern`]) so that repeated match calls never re-parse the
//! pattern text.  The free functions [`matches_path`] and [`matches_domain`]
//! wrap classification and matching into a single call for one-off use.

use regex::Regex;

use crate::error::ValidationError;

/// A file-path glob pattern, classified once at validation time.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// No wildcards; matches by exact string equality.
    Exact(String),
    /// One or more `*` wildcards, compiled to an anchored regex.  Each `*`
    /// matches any run of zero or more characters, including `/`.
    Wildcard {
        /// The original pattern text.
        pattern: String,
        /// The compiled anchored regex.
        regex: Regex,
    },
    /// A trailing `**`: the literal prefix plus anything after it,
    /// including nothing at all.
    RecursivePrefix {
        /// The original pattern text.
        pattern: String,
        /// The prefix before `**`, with any trailing `/` stripped.
        prefix: String,
    },
}

impl PathPattern {
    /// Classify `pattern`, rejecting misplaced recursive wildcards.
    ///
    /// `**` is only accepted as the trailing path segment: either the whole
    /// pattern, or a pattern ending in `/**`.  An empty pattern classifies
    /// as [`PathPattern::Exact`] and can only match the empty candidate;
    /// policy validation rejects empty entries separately.
    pub fn parse(pattern: &str) -> Result<Self, ValidationError> {
        if let Some(pos) = pattern.find("**") {
            let is_trailing_segment =
                pos == pattern.len() - 2 && (pattern == "**" || pattern.ends_with("/**"));
            if !is_trailing_segment {
                return Err(ValidationError::MalformedPathPattern {
                    pattern: pattern.to_string(),
                    reason: "`**` is only supported as the trailing path segment".to_string(),
                });
            }
            let prefix = pattern[..pos].trim_end_matches('/').to_string();
            return Ok(Self::RecursivePrefix {
                pattern: pattern.to_string(),
                prefix,
            });
        }

        if pattern.contains('*') {
            let regex = compile_wildcard(pattern)?;
            return Ok(Self::Wildcard {
                pattern: pattern.to_string(),
                regex,
            });
        }

        Ok(Self::Exact(pattern.to_string()))
    }

    /// Check whether `candidate` matches this pattern.
    ///
    /// Matching is case-sensitive and performs no canonicalization: `..`
    /// segments, symlinks, and separator normalization are the caller's
    /// responsibility.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(literal) => literal == candidate,
            Self::Wildcard { regex, .. } => regex.is_match(candidate),
            Self::RecursivePrefix { prefix, .. } => candidate.starts_with(prefix.as_str()),
        }
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(pattern)
            | Self::Wildcard { pattern, .. }
            | Self::RecursivePrefix { pattern, .. } => pattern,
        }
    }
}

/// A domain pattern: an exact hostname or a `*.suffix` wildcard.
///
/// Hostnames compare case-insensitively, so both forms keep a lowercased
/// copy of their matchable text alongside the original pattern.
#[derive(Debug, Clone)]
pub enum DomainPattern {
    /// Matches one hostname exactly.
    Exact {
        /// The original pattern text.
        pattern: String,
        /// The hostname, lowercased.
        host: String,
    },
    /// `*.suffix`: matches any hostname with at least one label before the
    /// suffix.  The bare suffix itself does not match and must be listed
    /// separately if the base domain should also be allowed.
    Suffix {
        /// The original pattern text.
        pattern: String,
        /// The suffix after `*.`, lowercased.
        suffix: String,
    },
}

impl DomainPattern {
    /// Classify `pattern`, rejecting wildcards anywhere but a leading `*.`.
    pub fn parse(pattern: &str) -> Result<Self, ValidationError> {
        if let Some(suffix) = pattern.strip_prefix("*.") {
            if suffix.is_empty() {
                return Err(ValidationError::MalformedDomainPattern {
                    pattern: pattern.to_string(),
                    reason: "wildcard suffix must not be empty".to_string(),
                });
            }
            if suffix.contains('*') {
                return Err(ValidationError::MalformedDomainPattern {
                    pattern: pattern.to_string(),
                    reason: "wildcard suffix must not contain `*`".to_string(),
                });
            }
            return Ok(Self::Suffix {
                pattern: pattern.to_string(),
                suffix: suffix.to_ascii_lowercase(),
            });
        }

        if pattern.contains('*') {
            return Err(ValidationError::MalformedDomainPattern {
                pattern: pattern.to_string(),
                reason: "`*` is only supported as a leading `*.` wildcard".to_string(),
            });
        }

        Ok(Self::Exact {
            pattern: pattern.to_string(),
            host: pattern.to_ascii_lowercase(),
        })
    }

    /// Check whether the hostname `candidate` matches this pattern,
    /// case-insensitively.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.to_ascii_lowercase();
        match self {
            Self::Exact { host, .. } => candidate == *host,
            Self::Suffix { suffix, .. } => candidate
                .strip_suffix(suffix.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
                .is_some_and(|label_part| !label_part.is_empty()),
        }
    }

    /// The original pattern text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact { pattern, .. } | Self::Suffix { pattern, .. } => pattern,
        }
    }
}

/// Check whether `candidate` matches a file-path glob `pattern`.
///
/// A malformed pattern (a misplaced `**`) is logged and treated as a
/// non-match; matching never fails on attacker-influenced input.
pub fn matches_path(pattern: &str, candidate: &str) -> bool {
    match PathPattern::parse(pattern) {
        Ok(compiled) => compiled.matches(candidate),
        Err(e) => {
            tracing::warn!(
                pattern,
                error = %e,
                "invalid path pattern; treating as non-match"
            );
            false
        }
    }
}

/// Check whether the hostname `candidate` matches a domain `pattern`.
///
/// A malformed pattern is logged and treated as a non-match.
pub fn matches_domain(pattern: &str, candidate: &str) -> bool {
    match DomainPattern::parse(pattern) {
        Ok(compiled) => compiled.matches(candidate),
        Err(e) => {
            tracing::warn!(
                pattern,
                error = %e,
                "invalid domain pattern; treating as non-match"
            );
            false
        }
    }
}

/// Build an anchored regex from a glob pattern: each `*` becomes `.*` and
/// every other character is escaped literally.  The `(?s)` flag lets `*`
/// span newlines, since candidates are arbitrary strings rather than
/// validated paths.
fn compile_wildcard(pattern: &str) -> Result<Regex, ValidationError> {
    let mut regex_str = String::with_capacity(pattern.len() + 8);
    regex_str.push_str("(?s)^");
    for ch in pattern.chars() {
        match ch {
            '*' => regex_str.push_str(".*"),
            '.' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '\\' | '|' => {
                regex_str.push('\\');
                regex_str.push(ch);
            }
            _ => regex_str.push(ch),
        }
    }
    regex_str.push('$');

    Regex::new(&regex_str).map_err(|e| ValidationError::MalformedPathPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
