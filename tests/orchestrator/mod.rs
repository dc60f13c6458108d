//! End-to-end save/restore round trip for the `labels` entity: saves from
//! one mock GitHub server into a temporary `DATA_PATH`, then restores from
//! that directory into a second mock server, asserting the label shows up
//! on the far side.

use std::sync::Mutex;

use secrecy::SecretString;

use github_mirror::config::{Operation, RepositoryVisibility};
use github_mirror::context::ConflictStrategy;
use github_mirror::entities::EntityRegistry;
use github_mirror::github::GithubClient;
use github_mirror::orchestrator::Orchestrator;
use github_mirror::storage::{JsonStorageService, StorageService};

use super::common::{Method::*, Request, Response, TestBuilder};

/// `EntityRegistry::discover` reads process-wide env vars; serialize every
/// test in this module so they don't stomp on each other's entity toggles.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn only_labels_enabled() {
    for var in [
        "INCLUDE_MILESTONES",
        "INCLUDE_ISSUES",
        "INCLUDE_COMMENTS",
        "INCLUDE_SUB_ISSUES",
        "INCLUDE_PULL_REQUESTS",
        "INCLUDE_PR_COMMENTS",
        "INCLUDE_PR_REVIEWS",
        "INCLUDE_PR_REVIEW_COMMENTS",
        "INCLUDE_RELEASES",
        "INCLUDE_GIT_REPOSITORY",
    ] {
        unsafe {
            std::env::set_var(var, "false");
        }
    }
    unsafe {
        std::env::set_var("INCLUDE_LABELS", "true");
    }
}

#[tokio::test]
async fn save_then_restore_round_trips_a_label() {
    let _guard = ENV_LOCK.lock().unwrap();
    only_labels_enabled();

    let source = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}/labels", |_req: Request| {
            Response::json(serde_json::json!([
                {"name": "bug", "color": "ff0000", "description": "a bug"},
            ]))
        })
        .build();

    let data_dir = tempfile::tempdir().unwrap();

    let save_api = GithubClient::new(
        SecretString::from("test-token".to_string()),
        format!("http://{}", source.addr),
        format!("http://{}/graphql", source.addr),
    );
    let storage = JsonStorageService::new(data_dir.path());
    let registry = EntityRegistry::discover().unwrap();
    let save_orchestrator = Orchestrator {
        registry,
        api: &save_api,
        storage: &storage,
        git: None,
        data_path: data_dir.path(),
        create_repository_if_missing: false,
        repository_visibility: RepositoryVisibility::Private,
        conflict_strategy: ConflictStrategy::default(),
        include_original_metadata: true,
    };
    let save_results = save_orchestrator.execute(Operation::Save, "octocat", "source-repo").await.unwrap();
    assert!(save_results.iter().all(|r| r.success));
    let labels_result = save_results.iter().find(|r| r.entity_name == "labels").unwrap();
    assert_eq!(labels_result.count, 1);
    assert!(data_dir.path().join("labels.json").exists());

    let target = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}", |_req: Request| {
            Response::json(serde_json::json!({"full_name": "octocat/target-repo"}))
        })
        .handler(Get, "repos/{owner}/{name}/labels", |_req: Request| Response::json(serde_json::json!([])))
        .handler(Post, "repos/{owner}/{name}/labels", |req: Request| {
            let body = req.json();
            assert_eq!(body["name"], "bug");
            assert_eq!(body["color"], "ff0000");
            Response::json(body)
        })
        .build();

    let restore_api = GithubClient::new(
        SecretString::from("test-token".to_string()),
        format!("http://{}", target.addr),
        format!("http://{}/graphql", target.addr),
    );
    let registry = EntityRegistry::discover().unwrap();
    let restore_orchestrator = Orchestrator {
        registry,
        api: &restore_api,
        storage: &storage,
        git: None,
        data_path: data_dir.path(),
        create_repository_if_missing: false,
        repository_visibility: RepositoryVisibility::Private,
        conflict_strategy: ConflictStrategy::default(),
        include_original_metadata: true,
    };
    let restore_results = restore_orchestrator
        .execute(Operation::Restore, "octocat", "target-repo")
        .await
        .unwrap();
    assert!(restore_results.iter().all(|r| r.success));
    let labels_result = restore_results.iter().find(|r| r.entity_name == "labels").unwrap();
    assert_eq!(labels_result.count, 1);

    assert_eq!(target.requests.count(Post, "/repos/octocat/target-repo/labels"), 1);
}

#[tokio::test]
async fn restore_refuses_missing_repository_without_create_flag() {
    let _guard = ENV_LOCK.lock().unwrap();
    only_labels_enabled();

    let target = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}", |_req: Request| Response::new().status(404))
        .build();

    let data_dir = tempfile::tempdir().unwrap();
    let storage = JsonStorageService::new(data_dir.path());
    storage.write_values(&[serde_json::json!({"name": "bug", "color": "ff0000"})], "labels.json").unwrap();

    let api = GithubClient::new(
        SecretString::from("test-token".to_string()),
        format!("http://{}", target.addr),
        format!("http://{}/graphql", target.addr),
    );
    let registry = EntityRegistry::discover().unwrap();
    let orchestrator = Orchestrator {
        registry,
        api: &api,
        storage: &storage,
        git: None,
        data_path: data_dir.path(),
        create_repository_if_missing: false,
        repository_visibility: RepositoryVisibility::Private,
        conflict_strategy: ConflictStrategy::default(),
        include_original_metadata: true,
    };

    let err = orchestrator.execute(Operation::Restore, "octocat", "missing-repo").await.unwrap_err();
    assert!(matches!(err, github_mirror::GithubDataError::Fatal(_)));
}
