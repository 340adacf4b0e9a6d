//! # sandbox-policy
//!
//! Core access-control logic for the tool-sandbox CLI.  This crate holds the
//! policy schema, pre-classifies path and domain matcher patterns at
//! validation time, and renders an allow/deny verdict for each access-check
//! request.  The engine performs no I/O of its own; loading and saving
//! policy files lives in the [`loader`] module.
//!
//! ## Quick start
//!
//! ```rust
//! use sandbox_policy::{Policy, PolicyEngine};
//!
//! let policy = Policy {
//!     name: "workspace".to_string(),
//!     allowed_file_paths: vec!["/home/user/**".to_string()],
//!     allowed_domains: vec!["*.trusted.io".to_string()],
//!     strict: false,
//! };
//! let engine = PolicyEngine::new(policy).unwrap();
//! let decision = engine.check_file_access("/home/user/notes.txt");
//! println!("{decision}");
//! ```

mod decision;
mod engine;
mod error;
pub mod loader;
pub mod matcher;
mod schema;

// Re-export primary public API at the crate root.
pub use decision::Decision;
pub use engine::PolicyEngine;
pub use error::ValidationError;
pub use matcher::{DomainPattern, PathPattern, matches_domain, matches_path};
pub use schema::Policy;
