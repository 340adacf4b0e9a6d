use serde::{Deserialize, Serialize};

/// The binary verdict returned for a single access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The candidate matched an allowed pattern, or the policy declares no
    /// restriction for this resource kind.
    Allowed,
    /// The candidate matched nothing the policy permits.
    Denied,
}

impl Decision {
    /// True when the verdict is [`Decision::Allowed`].
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => f.write_str("ALLOWED"),
            Self::Denied => f.write_str("DENIED"),
        }
    }
}
