//! Policy file loading and saving.
//!
//! Policies are persisted as plain JSON objects.  Only (de)serialization
//! happens here; structural validation is performed by
//! [`PolicyEngine::new`](crate::PolicyEngine::new), so the engine never
//! holds an unchecked policy.

use std::path::Path;

use anyhow::{Context, Result};

use crate::schema::Policy;

/// Load a [`Policy`] from a JSON file on disk.
pub fn load_policy(path: impl AsRef<Path>) -> Result<Policy> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file: {}", path.display()))?;
    load_policy_from_str(&contents)
        .with_context(|| format!("failed to parse policy file: {}", path.display()))
}

/// Parse a [`Policy`] from a JSON string.
///
/// Missing fields take their defaults (`"default"` for the name, empty
/// lists, non-strict).
pub fn load_policy_from_str(json: &str) -> Result<Policy> {
    let policy: Policy = serde_json::from_str(json).context("JSON deserialization failed")?;
    Ok(policy)
}

/// Serialize `policy` as pretty-printed JSON and write it to `path`.
pub fn save_policy(path: impl AsRef<Path>, policy: &Policy) -> Result<()> {
    let path = path.as_ref();
    let mut contents = serde_json::to_string_pretty(policy).context("JSON serialization failed")?;
    contents.push('\n');
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write policy file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_minimal_policy() {
        let policy = load_policy_from_str(r#"{"name": "minimal"}"#).unwrap();
        assert_eq!(policy.name, "minimal");
        assert!(policy.allowed_file_paths.is_empty());
        assert!(policy.allowed_domains.is_empty());
        assert!(!policy.strict);
    }

    #[test]
    fn load_full_policy() {
        let json = r#"
{
  "name": "workspace",
  "allowed_file_paths": ["/home/user/*", "/data/**"],
  "allowed_domains": ["example.com", "*.trusted.io"],
  "strict": true
}
"#;
        let policy = load_policy_from_str(json).unwrap();
        assert_eq!(policy.name, "workspace");
        assert_eq!(policy.allowed_file_paths.len(), 2);
        assert_eq!(policy.allowed_domains.len(), 2);
        assert!(policy.strict);
    }

    #[test]
    fn reject_invalid_json() {
        let err = load_policy_from_str("{not json").unwrap_err();
        assert!(
            err.to_string().contains("JSON deserialization failed"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn load_from_nonexistent_file() {
        let err = load_policy("/does/not/exist.json").unwrap_err();
        assert!(
            err.to_string().contains("failed to read policy file"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");

        let policy = Policy {
            name: "roundtrip".to_string(),
            allowed_file_paths: vec!["/data/**".to_string()],
            allowed_domains: vec!["*.trusted.io".to_string()],
            strict: true,
        };
        save_policy(&path, &policy).unwrap();

        let loaded = load_policy(&path).unwrap();
        assert_eq!(loaded.name, "roundtrip");
        assert_eq!(loaded.allowed_file_paths, vec!["/data/**"]);
        assert_eq!(loaded.allowed_domains, vec!["*.trusted.io"]);
        assert!(loaded.strict);
    }

    #[test]
    fn saved_file_ends_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        save_policy(&path, &Policy::default()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
    }
}
