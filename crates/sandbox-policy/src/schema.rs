use serde::{Deserialize, Serialize};

/// A declarative record of permitted file paths and network domains for a
/// sandboxed tool, persisted as a JSON object.
///
/// The record itself is plain data; structural validation happens when it is
/// handed to [`PolicyEngine::new`](crate::PolicyEngine::new), and a validated
/// policy is never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Identifying name; must be non-empty.
    #[serde(default = "default_name")]
    pub name: String,
    /// Glob patterns for permitted file paths, evaluated in order.
    #[serde(default)]
    pub allowed_file_paths: Vec<String>,
    /// Exact hostnames or `*.suffix` wildcard patterns.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// When true, an empty allow-list means "nothing permitted" rather than
    /// "no restriction".
    #[serde(default)]
    pub strict: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            name: default_name(),
            allowed_file_paths: Vec::new(),
            allowed_domains: Vec::new(),
            strict: false,
        }
    }
}

fn default_name() -> String {
    "default".to_string()
}
