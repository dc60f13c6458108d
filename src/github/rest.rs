//! Narrow, typed REST endpoints used by the save/restore strategies (spec
//! §4.1 save/restore operations; entity declarations list which of these
//! each entity calls).
//!
//! Grounded in the teacher's `github/repos.rs` (one inherent-impl-on-
//! `GithubClient` method per endpoint, raw JSON bodies built inline rather
//! than typed request structs, matching GitHub's REST surface directly).

use serde_json::{Value, json};

use crate::errors::GithubDataError;
use crate::github::client::GithubClient;

impl GithubClient {
    fn repo_url(&self, owner: &str, name: &str, suffix: &str) -> String {
        format!("{}/repos/{owner}/{name}{suffix}", self.api_url())
    }

    // --- Labels -------------------------------------------------------

    pub async fn list_labels(&self, owner: &str, name: &str) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_labels",
            &[("owner", owner), ("name", name)],
            &self.repo_url(owner, name, "/labels?per_page=100"),
        )
        .await
    }

    pub async fn create_label(&self, owner: &str, name: &str, body: &Value) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, "/labels"), body).await
    }

    pub async fn update_label(
        &self,
        owner: &str,
        name: &str,
        label_name: &str,
        body: &Value,
    ) -> Result<Value, GithubDataError> {
        self.patch_json(&self.repo_url(owner, name, &format!("/labels/{label_name}")), body)
            .await
    }

    pub async fn delete_label(&self, owner: &str, name: &str, label_name: &str) -> Result<(), GithubDataError> {
        self.delete_ok(&self.repo_url(owner, name, &format!("/labels/{label_name}")))
            .await
    }

    // --- Milestones -----------------------------------------------------

    pub async fn list_milestones(&self, owner: &str, name: &str) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_milestones",
            &[("owner", owner), ("name", name)],
            &self.repo_url(owner, name, "/milestones?state=all&per_page=100"),
        )
        .await
    }

    pub async fn create_milestone(&self, owner: &str, name: &str, body: &Value) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, "/milestones"), body).await
    }

    // --- Issues -----------------------------------------------------------

    pub async fn list_issues(&self, owner: &str, name: &str) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_issues",
            &[("owner", owner), ("name", name)],
            &self.repo_url(owner, name, "/issues?state=all&per_page=100&filter=all"),
        )
        .await
    }

    pub async fn get_issue(&self, owner: &str, name: &str, number: u64) -> Result<Value, GithubDataError> {
        let number = number.to_string();
        self.get_json_cached(
            "get_issue",
            &[("owner", owner), ("name", name), ("number", &number)],
            &self.repo_url(owner, name, &format!("/issues/{number}")),
        )
        .await
    }

    pub async fn create_issue(&self, owner: &str, name: &str, body: &Value) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, "/issues"), body).await
    }

    pub async fn update_issue(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        body: &Value,
    ) -> Result<Value, GithubDataError> {
        self.patch_json(&self.repo_url(owner, name, &format!("/issues/{number}")), body)
            .await
    }

    // --- Sub-issues (GraphQL-only on GitHub's side; REST addition endpoint) --

    pub async fn add_sub_issue(
        &self,
        owner: &str,
        name: &str,
        parent_number: u64,
        sub_issue_id: u64,
    ) -> Result<Value, GithubDataError> {
        self.post_json(
            &self.repo_url(owner, name, &format!("/issues/{parent_number}/sub_issues")),
            &json!({ "sub_issue_id": sub_issue_id }),
        )
        .await
    }

    // --- Comments (shared endpoint for issues and PRs) ---------------------

    pub async fn list_issue_comments(&self, owner: &str, name: &str, number: u64) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_cached(
            "list_issue_comments",
            &[("owner", owner), ("name", name), ("number", &number.to_string())],
            &self.repo_url(owner, name, &format!("/issues/{number}/comments?per_page=100")),
        )
        .await
    }

    pub async fn create_issue_comment(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        body: &Value,
    ) -> Result<Value, GithubDataError> {
        self.post_json(
            &self.repo_url(owner, name, &format!("/issues/{number}/comments")),
            body,
        )
        .await
    }

    // --- Pull requests ------------------------------------------------------

    pub async fn list_pull_requests(&self, owner: &str, name: &str) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_pull_requests",
            &[("owner", owner), ("name", name)],
            &self.repo_url(owner, name, "/pulls?state=all&per_page=100"),
        )
        .await
    }

    pub async fn create_pull_request(&self, owner: &str, name: &str, body: &Value) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, "/pulls"), body).await
    }

    // --- PR reviews ---------------------------------------------------------

    pub async fn list_pr_reviews(&self, owner: &str, name: &str, number: u64) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_pr_reviews",
            &[("owner", owner), ("name", name), ("number", &number.to_string())],
            &self.repo_url(owner, name, &format!("/pulls/{number}/reviews?per_page=100")),
        )
        .await
    }

    pub async fn create_pr_review(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        body: &Value,
    ) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, &format!("/pulls/{number}/reviews")), body)
            .await
    }

    // --- PR review comments (inline diff comments) --------------------------

    pub async fn list_pr_review_comments(
        &self,
        owner: &str,
        name: &str,
        number: u64,
    ) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_pr_review_comments",
            &[("owner", owner), ("name", name), ("number", &number.to_string())],
            &self.repo_url(owner, name, &format!("/pulls/{number}/comments?per_page=100")),
        )
        .await
    }

    /// Creates a review comment. When `body["in_reply_to"]` is set, GitHub
    /// threads it under that comment instead of anchoring a new diff
    /// position (spec §4.1: review comments with `in_reply_to_id` restore as
    /// replies).
    pub async fn create_pr_review_comment(
        &self,
        owner: &str,
        name: &str,
        number: u64,
        body: &Value,
    ) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, &format!("/pulls/{number}/comments")), body)
            .await
    }

    // --- Releases -------------------------------------------------------

    pub async fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Value>, GithubDataError> {
        self.get_json_list_cached(
            "list_releases",
            &[("owner", owner), ("name", name)],
            &self.repo_url(owner, name, "/releases?per_page=100"),
        )
        .await
    }

    pub async fn create_release(&self, owner: &str, name: &str, body: &Value) -> Result<Value, GithubDataError> {
        self.post_json(&self.repo_url(owner, name, "/releases"), body).await
    }

    pub async fn download_asset(&self, download_url: &str) -> Result<bytes::Bytes, GithubDataError> {
        let resp = reqwest::get(download_url).await?;
        Ok(resp.bytes().await?)
    }

    pub async fn upload_release_asset(
        &self,
        upload_url_template: &str,
        name: &str,
        content_type: &str,
        bytes: bytes::Bytes,
    ) -> Result<Value, GithubDataError> {
        let upload_url = upload_url_template.replace("{?name,label}", "");
        let url = format!("{upload_url}?name={name}");
        let resp = reqwest::Client::new()
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;
        Ok(resp.json().await?)
    }

    // --- Repository lifecycle ------------------------------------------

    pub async fn get_repository(&self, owner: &str, name: &str) -> Result<Value, GithubDataError> {
        self.get_json(&self.repo_url(owner, name, "")).await
    }

    pub async fn create_repository(&self, owner: &str, name: &str, private: bool) -> Result<Value, GithubDataError> {
        let url = format!("{}/orgs/{owner}/repos", self.api_url());
        let body = json!({ "name": name, "private": private });
        match self.post_json(&url, &body).await {
            Ok(v) => Ok(v),
            Err(GithubDataError::Validation(_)) | Err(GithubDataError::NotFound(_)) => {
                let url = format!("{}/user/repos", self.api_url());
                self.post_json(&url, &body).await
            }
            Err(e) => Err(e),
        }
    }
}
