//! Logging flags and tracing filter construction.

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Logging controls for the smoketest CLI.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "overhud_engine=trace,overhud_smoketest=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Crate targets that constitute "our" logs.
fn our_crates() -> &'static [&'static str] {
    &["overhud_smoketest", "overhud_engine", "overhud_protocol"]
}

/// Filter directive applying the same level to all of our crates.
fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|target| format!("{target}={lvl}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the filter spec, preferring an explicit directive, then level
/// flags, then `RUST_LOG`.
fn compute_spec(args: &LogArgs) -> String {
    if let Some(spec) = args.log_filter.as_deref() {
        return spec.to_string();
    }
    if args.trace {
        return level_spec_for("trace");
    }
    if args.debug {
        return level_spec_for("debug");
    }
    if let Some(level) = args.log_level.as_deref() {
        return level_spec_for(level);
    }
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

/// Install the global tracing subscriber.
pub fn init(args: &LogArgs) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(compute_spec(args)))
        .init();
}
