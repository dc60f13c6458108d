//! Command-line surface (spec §6, out of core scope, ambient here).
//!
//! Grounded in the teacher's `bin/project_goals.rs` use of `clap::Parser`
//! for its small ad-hoc binaries. Every flag falls back to the matching
//! environment variable `RunConfig::from_env` already reads, so a CI job
//! can configure the whole run through env vars alone and a human can
//! override individual flags at the shell.

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperationArg {
    Save,
    Restore,
}

#[derive(Parser, Debug)]
#[command(name = "github-mirror", about = "Save and restore GitHub repository state as JSON")]
pub struct Cli {
    /// `save` or `restore`. Falls back to the `OPERATION` env var.
    #[arg(value_enum)]
    pub operation: Option<OperationArg>,

    /// `owner/name` of the repository to act on. Falls back to `GITHUB_REPO`.
    #[arg(long, env = "GITHUB_REPO")]
    pub repo: Option<String>,

    /// Directory holding the per-entity JSON files. Falls back to `DATA_PATH`.
    #[arg(long, env = "DATA_PATH")]
    pub data_path: Option<std::path::PathBuf>,

    /// Create the target repository if restore targets one that doesn't exist.
    #[arg(long, env = "CREATE_REPOSITORY_IF_MISSING")]
    pub create_repository_if_missing: bool,

    /// Label conflict resolution during restore: skip, overwrite,
    /// fail_if_conflict, merge, or rename. Falls back to `LABEL_CONFLICT_STRATEGY`.
    #[arg(long, env = "LABEL_CONFLICT_STRATEGY")]
    pub label_conflict_strategy: Option<String>,
}
