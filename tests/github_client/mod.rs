//! `GithubClient` tests: list/create REST calls, caching, and 404 downgrade,
//! exercised against the `common` module's in-process HTTP test double.

use std::sync::Arc;

use secrecy::SecretString;

use github_mirror::cache::NullCache;
use github_mirror::errors::GithubDataError;
use github_mirror::github::GithubClient;

use super::common::{Method::*, Request, Response, TestBuilder};

fn client_for(server_addr: std::net::SocketAddr) -> GithubClient {
    GithubClient::new(
        SecretString::from("test-token".to_string()),
        format!("http://{server_addr}"),
        format!("http://{server_addr}/graphql"),
    )
    .with_cache(Arc::new(NullCache))
}

#[tokio::test]
async fn list_labels_parses_response() {
    let server = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}/labels", |req: Request| {
            assert_eq!(req.components["owner"], "octocat");
            assert_eq!(req.components["name"], "hello-world");
            Response::json(serde_json::json!([
                {"name": "bug", "color": "ff0000"},
                {"name": "docs", "color": "0000ff"},
            ]))
        })
        .build();

    let gh = client_for(server.addr);
    let labels = gh.list_labels("octocat", "hello-world").await.unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0]["name"], "bug");
}

#[tokio::test]
async fn create_label_posts_body() {
    let server = TestBuilder::default()
        .handler(Post, "repos/{owner}/{name}/labels", |req: Request| {
            let body = req.json();
            assert_eq!(body["name"], "bug");
            Response::json(serde_json::json!({"name": "bug", "color": "ff0000"}))
        })
        .build();

    let gh = client_for(server.addr);
    let created = gh
        .create_label("octocat", "hello-world", &serde_json::json!({"name": "bug", "color": "ff0000"}))
        .await
        .unwrap();
    assert_eq!(created["name"], "bug");
}

#[tokio::test]
async fn get_issue_404_downgrades_to_not_found() {
    let server = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}/issues/{number}", |_req| {
            Response::new().status(404).body(b"{\"message\": \"Not Found\"}")
        })
        .build();

    let gh = client_for(server.addr);
    let err = gh.get_issue("octocat", "hello-world", 42).await.unwrap_err();
    assert!(matches!(err, GithubDataError::NotFound(_)));
}

#[tokio::test]
async fn list_labels_uses_cache_on_second_call() {
    let server = TestBuilder::default()
        .handler(Get, "repos/{owner}/{name}/labels", |_req| {
            Response::json(serde_json::json!([{"name": "bug", "color": "ff0000"}]))
        })
        .build();

    let gh = GithubClient::new(
        SecretString::from("test-token".to_string()),
        format!("http://{}", server.addr),
        format!("http://{}/graphql", server.addr),
    );

    gh.list_labels("octocat", "hello-world").await.unwrap();
    gh.list_labels("octocat", "hello-world").await.unwrap();

    assert_eq!(server.requests.count(Get, "/repos/octocat/hello-world/labels"), 1);
}

#[tokio::test]
async fn update_label_patches_by_name() {
    let server = TestBuilder::default()
        .handler(Patch, "repos/{owner}/{name}/labels/{label_name}", |req: Request| {
            assert_eq!(req.components["label_name"], "bug");
            Response::json(serde_json::json!({"name": "bug", "color": "00ff00"}))
        })
        .build();

    let gh = client_for(server.addr);
    let updated = gh
        .update_label("octocat", "hello-world", "bug", &serde_json::json!({"color": "00ff00"}))
        .await
        .unwrap();
    assert_eq!(updated["color"], "00ff00");
}

#[tokio::test]
async fn delete_label_succeeds_on_204() {
    let server = TestBuilder::default()
        .handler(Delete, "repos/{owner}/{name}/labels/{label_name}", |_req| {
            Response::new().status(204)
        })
        .build();

    let gh = client_for(server.addr);
    gh.delete_label("octocat", "hello-world", "bug").await.unwrap();
}
