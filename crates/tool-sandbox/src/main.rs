mod audit;
mod cli;

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use sandbox_policy::{Policy, PolicyEngine, loader};

use crate::audit::AuditRecord;
use crate::cli::{Cli, Commands, ResourceType};

fn main() -> ExitCode {
    // Diagnostics go to stderr so that stdout carries only command output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Init {
            output,
            name,
            allowed_paths,
            allowed_domains,
            strict,
        } => cmd_init(&output, name, allowed_paths, allowed_domains, strict),
        Commands::Check {
            policy,
            resource_type,
            resource,
            audit_log,
        } => cmd_check(&policy, resource_type, &resource, audit_log.as_deref()),
        Commands::Validate { policy } => cmd_validate(&policy),
        Commands::List { policy } => cmd_list(&policy),
    }
}

/// Write a new policy file.
fn cmd_init(
    output: &Path,
    name: String,
    allowed_paths: Vec<String>,
    allowed_domains: Vec<String>,
    strict: bool,
) -> Result<u8> {
    let policy = Policy {
        name,
        allowed_file_paths: allowed_paths,
        allowed_domains,
        strict,
    };

    // Validate up front; a malformed pattern should never reach disk.
    PolicyEngine::new(policy.clone()).context("refusing to write an invalid policy")?;

    loader::save_policy(output, &policy)?;
    println!("Created policy file: {}", output.display());
    Ok(0)
}

/// Evaluate one access request and report the verdict.
fn cmd_check(
    policy_path: &Path,
    resource_type: ResourceType,
    resource: &str,
    audit_log: Option<&Path>,
) -> Result<u8> {
    let policy = loader::load_policy(policy_path)?;
    let engine = PolicyEngine::new(policy).context("invalid policy")?;
    debug!(?engine, "policy engine ready");

    let decision = match resource_type {
        ResourceType::File => engine.check_file_access(resource),
        ResourceType::Network => engine.check_network_access(resource),
    };

    if let Some(path) = audit_log {
        let record = AuditRecord::new(
            engine.policy().name.clone(),
            resource_type.as_str(),
            resource,
            decision,
        );
        audit::append_record(path, &record).context("failed to write audit record")?;
    }

    if decision.is_allowed() {
        println!("ALLOWED: {resource}");
        Ok(0)
    } else {
        println!("DENIED: {resource} - {}", denial_reason(&engine, resource_type));
        Ok(1)
    }
}

/// Human-readable explanation for a denial, distinguishing a strict empty
/// allow-list from an ordinary non-match.
fn denial_reason(engine: &PolicyEngine, resource_type: ResourceType) -> &'static str {
    let policy = engine.policy();
    match resource_type {
        ResourceType::File if policy.allowed_file_paths.is_empty() => {
            "no file paths allowed in strict policy"
        }
        ResourceType::File => "path not allowed",
        ResourceType::Network if policy.allowed_domains.is_empty() => {
            "no domains allowed in strict policy"
        }
        ResourceType::Network => "domain not allowed",
    }
}

/// Load and validate a policy file, reporting its shape.
fn cmd_validate(policy_path: &Path) -> Result<u8> {
    let policy = match loader::load_policy(policy_path) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Invalid policy: {e:#}");
            return Ok(1);
        }
    };

    match PolicyEngine::new(policy) {
        Ok(engine) => {
            let policy = engine.policy();
            println!("Valid policy: {}", policy.name);
            println!("  Allowed paths: {}", policy.allowed_file_paths.len());
            println!("  Allowed domains: {}", policy.allowed_domains.len());
            Ok(0)
        }
        Err(e) => {
            eprintln!("Invalid policy: {e}");
            Ok(1)
        }
    }
}

/// Print the policy name and both pattern lists.
fn cmd_list(policy_path: &Path) -> Result<u8> {
    let policy = loader::load_policy(policy_path)?;

    println!("Policy: {}", policy.name);
    println!("  Allowed file paths:");
    for pattern in &policy.allowed_file_paths {
        println!("    - {pattern}");
    }
    if policy.allowed_file_paths.is_empty() {
        println!("    (none)");
    }
    println!("  Allowed domains:");
    for pattern in &policy.allowed_domains {
        println!("    - {pattern}");
    }
    if policy.allowed_domains.is_empty() {
        println!("    (none)");
    }
    Ok(0)
}
