//! Binary entrypoint: parses configuration, wires the engine together, runs
//! one save or restore, and maps the aggregate result to an exit code
//! (spec §7 "Exit codes").

use clap::Parser;
use github_mirror::cli::{Cli, OperationArg};
use github_mirror::config::{Operation, RunConfig};
use github_mirror::entities::EntityRegistry;
use github_mirror::git::ProcessGitService;
use github_mirror::github::GithubClient;
use github_mirror::orchestrator::Orchestrator;
use github_mirror::storage::JsonStorageService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(true) => std::process::ExitCode::SUCCESS,
        Ok(false) => std::process::ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "fatal error");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    let mut config = RunConfig::from_env()?;

    if let Some(repo) = cli.repo {
        config.repo = repo.parse()?;
    }
    if let Some(data_path) = cli.data_path {
        config.data_path = data_path;
    }
    if cli.create_repository_if_missing {
        config.create_repository_if_missing = true;
    }
    if let Some(strategy) = cli.label_conflict_strategy {
        config.label_conflict_strategy = strategy.parse().map_err(|e: github_mirror::GithubDataError| anyhow::anyhow!(e))?;
    }
    let operation = match cli.operation {
        Some(OperationArg::Save) => Operation::Save,
        Some(OperationArg::Restore) => Operation::Restore,
        None => config.operation,
    };

    let registry = EntityRegistry::discover()?;
    let api = GithubClient::new_from_env(config.token.clone());
    let storage = JsonStorageService::new(&config.data_path);
    let git = ProcessGitService;

    let orchestrator = Orchestrator {
        registry,
        api: &api,
        storage: &storage,
        git: Some(&git),
        data_path: &config.data_path,
        create_repository_if_missing: config.create_repository_if_missing,
        repository_visibility: config.repository_visibility,
        conflict_strategy: config.label_conflict_strategy,
        include_original_metadata: config.include_original_metadata,
    };

    let results = orchestrator
        .execute(operation, &config.repo.owner, &config.repo.name)
        .await?;

    Ok(results.iter().all(|r| r.success))
}
