use tracing::{debug, trace};

use crate::decision::Decision;
use crate::error::ValidationError;
use crate::matcher::{DomainPattern, PathPattern};
use crate::schema::Policy;

/// Validates tool access requests against a [`Policy`].
///
/// Construction validates the policy and pre-classifies every pattern;
/// afterwards the check methods are pure functions of the policy and the
/// candidate string, so a shared engine can serve concurrent callers with
/// no synchronization.
pub struct PolicyEngine {
    policy: Policy,
    /// Compiled patterns parallel to `policy.allowed_file_paths`.
    path_patterns: Vec<PathPattern>,
    /// Compiled patterns parallel to `policy.allowed_domains`.
    domain_patterns: Vec<DomainPattern>,
}

impl std::fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("policy", &self.policy.name)
            .field("num_path_patterns", &self.path_patterns.len())
            .field("num_domain_patterns", &self.domain_patterns.len())
            .field("strict", &self.policy.strict)
            .finish()
    }
}

impl PolicyEngine {
    /// Validate `policy` and pre-compile its patterns.
    ///
    /// Returns the first structural violation found: an empty name, an
    /// empty pattern entry, a misplaced `**`, or a malformed domain
    /// wildcard.  No partially-valid engine is ever produced, and
    /// validation is never re-run per query.
    pub fn new(policy: Policy) -> Result<Self, ValidationError> {
        if policy.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let path_patterns = policy
            .allowed_file_paths
            .iter()
            .map(|pattern| parse_path_entry(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let domain_patterns = policy
            .allowed_domains
            .iter()
            .map(|pattern| parse_domain_entry(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            policy,
            path_patterns,
            domain_patterns,
        })
    }

    /// The validated policy this engine answers for.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Decide whether `path` may be accessed.
    ///
    /// An empty allow-list means "no restriction" unless the policy is
    /// strict, in which case it means "nothing permitted".  A non-empty
    /// list denies anything it does not match, strict or not.
    pub fn check_file_access(&self, path: &str) -> Decision {
        debug!(path, policy = %self.policy.name, "checking file access");

        if self.path_patterns.is_empty() {
            return self.empty_list_default();
        }

        for pattern in &self.path_patterns {
            if pattern.matches(path) {
                trace!(pattern = pattern.as_str(), "path pattern matched");
                return Decision::Allowed;
            }
        }

        Decision::Denied
    }

    /// Decide whether the host in `target` may be contacted.
    ///
    /// `target` may carry a `:port` suffix, which is stripped before
    /// matching.
    pub fn check_network_access(&self, target: &str) -> Decision {
        let host = target.split_once(':').map_or(target, |(host, _)| host);
        debug!(host, policy = %self.policy.name, "checking network access");

        if self.domain_patterns.is_empty() {
            return self.empty_list_default();
        }

        for pattern in &self.domain_patterns {
            if pattern.matches(host) {
                trace!(pattern = pattern.as_str(), "domain pattern matched");
                return Decision::Allowed;
            }
        }

        Decision::Denied
    }

    fn empty_list_default(&self) -> Decision {
        if self.policy.strict {
            Decision::Denied
        } else {
            Decision::Allowed
        }
    }
}

fn parse_path_entry(pattern: &str) -> Result<PathPattern, ValidationError> {
    if pattern.is_empty() {
        return Err(ValidationError::MalformedPathPattern {
            pattern: String::new(),
            reason: "pattern must not be empty".to_string(),
        });
    }
    PathPattern::parse(pattern)
}

fn parse_domain_entry(pattern: &str) -> Result<DomainPattern, ValidationError> {
    if pattern.is_empty() {
        return Err(ValidationError::MalformedDomainPattern {
            pattern: String::new(),
            reason: "pattern must not be empty".to_string(),
        });
    }
    DomainPattern::parse(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(paths: &[&str], domains: &[&str], strict: bool) -> Policy {
        Policy {
            name: "test".to_string(),
            allowed_file_paths: paths.iter().map(|s| s.to_string()).collect(),
            allowed_domains: domains.iter().map(|s| s.to_string()).collect(),
            strict,
        }
    }

    fn engine(paths: &[&str], domains: &[&str], strict: bool) -> PolicyEngine {
        PolicyEngine::new(policy(paths, domains, strict)).expect("test policy should validate")
    }

    // -- empty allow-lists --

    #[test]
    fn empty_lists_are_unrestricted_when_not_strict() {
        let engine = engine(&[], &[], false);
        assert_eq!(engine.check_file_access("/etc/passwd"), Decision::Allowed);
        assert_eq!(engine.check_file_access(""), Decision::Allowed);
        assert_eq!(engine.check_network_access("evil.example"), Decision::Allowed);
    }

    #[test]
    fn empty_lists_deny_everything_when_strict() {
        let engine = engine(&[], &[], true);
        assert_eq!(engine.check_file_access("/etc/passwd"), Decision::Denied);
        assert_eq!(engine.check_file_access(""), Decision::Denied);
        assert_eq!(engine.check_network_access("example.com"), Decision::Denied);
    }

    #[test]
    fn strict_flag_is_per_policy_not_per_list_kind() {
        // Only the domain list is empty; the path list still applies.
        let engine = engine(&["/data/**"], &[], true);
        assert_eq!(engine.check_file_access("/data/x"), Decision::Allowed);
        assert_eq!(engine.check_network_access("example.com"), Decision::Denied);
    }

    // -- non-empty allow-lists --

    #[test]
    fn non_match_is_denied_regardless_of_strict() {
        for strict in [false, true] {
            let engine = engine(&["/home/user/*"], &["example.com"], strict);
            assert_eq!(engine.check_file_access("/etc/passwd"), Decision::Denied);
            assert_eq!(engine.check_network_access("evil.example"), Decision::Denied);
        }
    }

    #[test]
    fn first_matching_pattern_allows() {
        let engine = engine(&["/a/*", "/b/*"], &[], false);
        assert_eq!(engine.check_file_access("/a/x"), Decision::Allowed);
        assert_eq!(engine.check_file_access("/b/y"), Decision::Allowed);
        assert_eq!(engine.check_file_access("/c/z"), Decision::Denied);
    }

    #[test]
    fn documented_scenario() {
        let engine = engine(
            &["/home/user/*", "/data/**"],
            &["example.com", "*.trusted.io"],
            false,
        );
        assert_eq!(engine.check_file_access("/home/user/file.txt"), Decision::Allowed);
        assert_eq!(engine.check_file_access("/etc/passwd"), Decision::Denied);
        // The exact pattern does not cover subdomains.
        assert_eq!(engine.check_network_access("api.example.com"), Decision::Denied);
        assert_eq!(engine.check_network_access("sub.trusted.io"), Decision::Allowed);
    }

    // -- network candidates --

    #[test]
    fn port_suffix_is_stripped_before_matching() {
        let engine = engine(&[], &["example.com", "*.trusted.io"], false);
        assert_eq!(engine.check_network_access("example.com:443"), Decision::Allowed);
        assert_eq!(engine.check_network_access("sub.trusted.io:8443"), Decision::Allowed);
        assert_eq!(engine.check_network_access("evil.example:443"), Decision::Denied);
    }

    #[test]
    fn domain_check_is_case_insensitive() {
        let engine = engine(&[], &["example.com"], false);
        assert_eq!(engine.check_network_access("EXAMPLE.com"), Decision::Allowed);
    }

    #[test]
    fn control_characters_are_ordinary_candidate_text() {
        let engine = engine(&["/home/user/*"], &[], false);
        assert_eq!(engine.check_file_access("/home/user/\0\n"), Decision::Allowed);
        assert_eq!(engine.check_file_access("\0"), Decision::Denied);
    }

    // -- validation --

    #[test]
    fn rejects_empty_name() {
        let mut bad = policy(&[], &[], false);
        bad.name = String::new();
        let err = PolicyEngine::new(bad).unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn rejects_mid_pattern_recursive_wildcard() {
        let err = PolicyEngine::new(policy(&["/a/**/b"], &[], false)).unwrap_err();
        match err {
            ValidationError::MalformedPathPattern { pattern, .. } => {
                assert_eq!(pattern, "/a/**/b");
            }
            other => panic!("expected MalformedPathPattern, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_path_pattern() {
        let err = PolicyEngine::new(policy(&[""], &[], false)).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedPathPattern { .. }));
    }

    #[test]
    fn rejects_empty_wildcard_suffix() {
        let err = PolicyEngine::new(policy(&[], &["*."], false)).unwrap_err();
        match err {
            ValidationError::MalformedDomainPattern { pattern, .. } => {
                assert_eq!(pattern, "*.");
            }
            other => panic!("expected MalformedDomainPattern, got {other:?}"),
        }
    }

    #[test]
    fn rejects_inner_domain_wildcard() {
        let err = PolicyEngine::new(policy(&[], &["api.*.com"], false)).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedDomainPattern { .. }));
    }

    #[test]
    fn rejects_empty_domain_pattern() {
        let err = PolicyEngine::new(policy(&[], &[""], false)).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedDomainPattern { .. }));
    }

    #[test]
    fn first_violation_wins() {
        // Both lists are malformed; the path list is validated first.
        let err = PolicyEngine::new(policy(&["/a/**/b"], &["*."], false)).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedPathPattern { .. }));
    }

    // -- accessors --

    #[test]
    fn policy_accessor_returns_validated_policy() {
        let engine = engine(&["/data/**"], &["example.com"], true);
        assert_eq!(engine.policy().name, "test");
        assert_eq!(engine.policy().allowed_file_paths, vec!["/data/**"]);
        assert!(engine.policy().strict);
    }
}
