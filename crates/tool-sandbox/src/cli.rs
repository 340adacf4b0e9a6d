use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "tool-sandbox",
    version,
    about = "Enforce file/network access policies for agent tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new policy file
    Init {
        /// Output policy file path
        output: PathBuf,

        /// Policy name
        #[arg(long, default_value = "default")]
        name: String,

        /// Allowed file paths (globs)
        #[arg(long, num_args = 1..)]
        allowed_paths: Vec<String>,

        /// Allowed network domains
        #[arg(long, num_args = 1..)]
        allowed_domains: Vec<String>,

        /// Treat empty allow-lists as "nothing permitted"
        #[arg(long)]
        strict: bool,
    },

    /// Check whether access to a resource is allowed
    Check {
        /// Policy file path
        policy: PathBuf,

        /// Resource type
        resource_type: ResourceType,

        /// Resource to check (a path, or a domain with optional :port)
        resource: String,

        /// Append the decision to a JSON-lines audit log
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },

    /// Validate a policy file
    Validate {
        /// Policy file path
        policy: PathBuf,
    },

    /// List policy contents
    List {
        /// Policy file path
        policy: PathBuf,
    },
}

/// The kind of resource being checked.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceType {
    /// A filesystem path
    File,
    /// A network domain
    Network,
}

impl ResourceType {
    /// The lowercase name used in output and audit records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Network => "network",
        }
    }
}
