//! Concrete `SaveStrategy`/`RestoreStrategy` implementations, one pair per
//! entity (spec §3 table, §4.4).
//!
//! Each save strategy follows the same shape: fetch raw JSON from the API
//! Mediator, run it through its converter, filter (selective and/or
//! parent-child coupling), persist, and record anything downstream
//! strategies need in `Context`. Each restore strategy mirrors that: read
//! persisted entities, remap references through `Context`, sanitize and
//! footer the body, create on the target, and record the new id/number.

use std::collections::BTreeSet;

use async_trait::async_trait;
use number_spec::Enablement;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::context::Context;
use crate::converters::ConverterRegistry;
use crate::errors::GithubDataError;
use crate::label_conflict::{self, Outcome};
use crate::models::*;
use crate::sanitize::{self, FooterFields};
use crate::storage::{read_entities, write_entities};

use super::{RestoreStrategy, SaveStrategy, ServiceBag, coupling, selective};

fn convert_all<T: DeserializeOwned>(
    converters: &ConverterRegistry,
    converter_name: &str,
    raw: Vec<Value>,
) -> Result<Vec<T>, GithubDataError> {
    let converter = converters.get(converter_name)?;
    raw.iter().map(|item| {
        let converted = converter(item)?;
        serde_json::from_value(converted).map_err(|e| GithubDataError::Validation(e.to_string()))
    }).collect()
}

fn footer_fields<'a>(
    author_login: &'a str,
    created_at: &'a str,
    updated_at: Option<&'a str>,
    url: &'a str,
) -> FooterFields<'a> {
    FooterFields { original_author_login: author_login, created_at, updated_at, original_url: url }
}

// --- Labels ------------------------------------------------------------

pub struct LabelsSave;

#[async_trait]
impl SaveStrategy for LabelsSave {
    fn entity_name(&self) -> &'static str {
        "labels"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let raw = services.api.list_labels(owner, repo).await?;
        let labels: Vec<Label> = convert_all(services.converters, "convert_to_label", raw)?;
        write_entities(services.storage, &labels, "labels.json")?;
        Ok(labels.len())
    }
}

pub struct LabelsRestore;

#[async_trait]
impl RestoreStrategy for LabelsRestore {
    fn entity_name(&self) -> &'static str {
        "labels"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let incoming: Vec<Label> = read_entities(services.storage, "labels.json")?;
        let raw_existing = services.api.list_labels(owner, repo).await?;
        let existing: Vec<Label> = convert_all(services.converters, "convert_to_label", raw_existing)?;
        let mut names: Vec<String> = existing.iter().map(|l| l.name.clone()).collect();

        let mut count = 0;
        for label in incoming {
            let matched = existing.iter().find(|e| e.name == label.name);
            let outcome = label_conflict::resolve(context.conflict_strategy, label, matched, &names);
            match outcome {
                Outcome::Skip => {}
                Outcome::Fail(message) => return Err(GithubDataError::Conflict(message)),
                Outcome::Create(label) => {
                    let body = json!({ "name": label.name, "color": label.color, "description": label.description });
                    services.api.create_label(owner, repo, &body).await?;
                    names.push(label.name);
                    count += 1;
                }
                Outcome::Update(label) => {
                    let body = json!({ "new_name": label.name, "color": label.color, "description": label.description });
                    services.api.update_label(owner, repo, &label.name, &body).await?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }
}

// --- Milestones ----------------------------------------------------------

pub struct MilestonesSave;

#[async_trait]
impl SaveStrategy for MilestonesSave {
    fn entity_name(&self) -> &'static str {
        "milestones"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let raw = services.api.list_milestones(owner, repo).await?;
        let milestones: Vec<Milestone> = convert_all(services.converters, "convert_to_milestone", raw)?;
        write_entities(services.storage, &milestones, "milestones.json")?;
        Ok(milestones.len())
    }
}

pub struct MilestonesRestore;

#[async_trait]
impl RestoreStrategy for MilestonesRestore {
    fn entity_name(&self) -> &'static str {
        "milestones"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let milestones: Vec<Milestone> = read_entities(services.storage, "milestones.json")?;
        let mut count = 0;
        for milestone in milestones {
            let body = json!({
                "title": milestone.title,
                "state": milestone.state,
                "due_on": milestone.due_on,
            });
            let created = services.api.create_milestone(owner, repo, &body).await?;
            let new_number = created["number"].as_u64().ok_or_else(|| {
                GithubDataError::Validation("created milestone missing number".to_string())
            })?;
            context.milestone_number_map.insert(milestone.number, new_number);
            count += 1;
        }
        Ok(count)
    }
}

// --- Issues --------------------------------------------------------------

pub struct IssuesSave;

#[async_trait]
impl SaveStrategy for IssuesSave {
    fn entity_name(&self) -> &'static str {
        "issues"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let raw = services.api.list_issues(owner, repo).await?;
        let issues: Vec<Issue> = convert_all(services.converters, "convert_to_issue", raw)?;
        let issues = selective::apply(issues, enablement, "issues", |i| i.number);
        write_entities(services.storage, &issues, "issues.json")?;
        context.saved_parents.record_issues(issues.clone());
        Ok(issues.len())
    }
}

pub struct IssuesRestore;

#[async_trait]
impl RestoreStrategy for IssuesRestore {
    fn entity_name(&self) -> &'static str {
        "issues"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let issues: Vec<Issue> = read_entities(services.storage, "issues.json")?;
        let mut count = 0;
        for issue in issues {
            let milestone = issue.milestone.and_then(|old| context.map_milestone(old));
            if issue.milestone.is_some() && milestone.is_none() {
                tracing::warn!(number = issue.number, "milestone not found, dropping assignment");
            }

            let body_with_footer = sanitize::append_metadata_footer(
                &sanitize::sanitize_mentions(&issue.body),
                &footer_fields(
                    &issue.author.login,
                    &issue.created_at.to_rfc3339(),
                    Some(&issue.updated_at.to_rfc3339()),
                    &issue.html_url,
                ),
            );

            let body = json!({
                "title": issue.title,
                "body": body_with_footer,
                "labels": issue.labels.iter().map(|l| &l.name).collect::<Vec<_>>(),
                "milestone": milestone,
            });
            let created = services.api.create_issue(owner, repo, &body).await?;
            let new_number = created["number"].as_u64().ok_or_else(|| {
                GithubDataError::Validation("created issue missing number".to_string())
            })?;
            context.issue_number_map.insert(issue.number, new_number);

            if issue.state == IssueState::Closed {
                let close_body = json!({ "state": "closed", "state_reason": issue.state_reason });
                services.api.update_issue(owner, repo, new_number, &close_body).await?;
            }
            count += 1;
        }
        Ok(count)
    }
}

// --- Comments --------------------------------------------------------------

pub struct CommentsSave;

#[async_trait]
impl SaveStrategy for CommentsSave {
    fn entity_name(&self) -> &'static str {
        "comments"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let parent_numbers: BTreeSet<u64> = context.saved_parents.issues().iter().map(|i| i.number).collect();

        let mut all_comments = Vec::new();
        for number in &parent_numbers {
            let raw = services.api.list_issue_comments(owner, repo, *number).await?;
            let comments: Vec<Comment> = convert_all(services.converters, "convert_to_comment", raw)?;
            all_comments.extend(comments);
        }

        let filtered = coupling::filter_by_parent(all_comments, &parent_numbers, "comments", |c| c.issue_number);
        write_entities(services.storage, &filtered, "comments.json")?;
        Ok(filtered.len())
    }
}

pub struct CommentsRestore;

#[async_trait]
impl RestoreStrategy for CommentsRestore {
    fn entity_name(&self) -> &'static str {
        "comments"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let comments: Vec<Comment> = read_entities(services.storage, "comments.json")?;
        let mut count = 0;
        for comment in comments {
            let Some(new_issue_number) = context.map_issue(comment.issue_number) else {
                tracing::warn!(issue_number = comment.issue_number, "parent issue not restored, skipping comment");
                continue;
            };
            let body = sanitize::append_metadata_footer(
                &sanitize::sanitize_mentions(&comment.body),
                &footer_fields(
                    &comment.author.login,
                    &comment.created_at.to_rfc3339(),
                    Some(&comment.updated_at.to_rfc3339()),
                    &comment.html_url,
                ),
            );
            services
                .api
                .create_issue_comment(owner, repo, new_issue_number, &json!({ "body": body }))
                .await?;
            count += 1;
        }
        Ok(count)
    }
}

// --- Sub-issues --------------------------------------------------------

pub struct SubIssuesSave;

#[async_trait]
impl SaveStrategy for SubIssuesSave {
    fn entity_name(&self) -> &'static str {
        "sub_issues"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let parent_numbers: BTreeSet<u64> = context.saved_parents.issues().iter().map(|i| i.number).collect();

        let mut all_edges = Vec::new();
        for number in &parent_numbers {
            all_edges.extend(services.api.list_sub_issues(owner, repo, *number).await?);
        }

        let filtered = coupling::filter_by_parent(all_edges, &parent_numbers, "sub_issues", |e| e.parent_issue_number);
        write_entities(services.storage, &filtered, "sub_issues.json")?;
        Ok(filtered.len())
    }
}

pub struct SubIssuesRestore;

#[async_trait]
impl RestoreStrategy for SubIssuesRestore {
    fn entity_name(&self) -> &'static str {
        "sub_issues"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let mut edges: Vec<SubIssueEdge> = read_entities(services.storage, "sub_issues.json")?;
        edges.sort_by_key(|e| e.position);

        let mut count = 0;
        for edge in edges {
            let (Some(parent), Some(child)) =
                (context.map_issue(edge.parent_issue_number), context.map_issue(edge.sub_issue_number))
            else {
                tracing::warn!(?edge, "orphaned sub-issue edge, skipping");
                continue;
            };
            let child_issue_raw = services.api.get_issue(owner, repo, child).await?;
            let child_id = child_issue_raw["id"].as_u64().ok_or_else(|| {
                GithubDataError::Validation("issue missing numeric id".to_string())
            })?;
            services.api.add_sub_issue(owner, repo, parent, child_id).await?;
            count += 1;
        }
        Ok(count)
    }
}

// --- Pull requests --------------------------------------------------------

pub struct PullRequestsSave;

#[async_trait]
impl SaveStrategy for PullRequestsSave {
    fn entity_name(&self) -> &'static str {
        "pull_requests"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let raw = services.api.list_pull_requests(owner, repo).await?;
        let prs: Vec<PullRequest> = convert_all(services.converters, "convert_to_pull_request", raw)?;
        let prs = selective::apply(prs, enablement, "pull_requests", |p| p.number);
        write_entities(services.storage, &prs, "pull_requests.json")?;
        context.saved_parents.record_pull_requests(prs.clone());
        Ok(prs.len())
    }
}

pub struct PullRequestsRestore;

#[async_trait]
impl RestoreStrategy for PullRequestsRestore {
    fn entity_name(&self) -> &'static str {
        "pull_requests"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let prs: Vec<PullRequest> = read_entities(services.storage, "pull_requests.json")?;
        let mut count = 0;
        for pr in prs {
            let body_with_footer = sanitize::append_metadata_footer(
                &sanitize::sanitize_mentions(&pr.body),
                &footer_fields(
                    &pr.author.login,
                    &pr.created_at.to_rfc3339(),
                    Some(&pr.updated_at.to_rfc3339()),
                    &pr.html_url,
                ),
            );
            let body = json!({
                "title": pr.title,
                "body": body_with_footer,
                "head": pr.head_ref,
                "base": pr.base_ref,
            });
            let created = services.api.create_pull_request(owner, repo, &body).await?;
            let new_number = created["number"].as_u64().ok_or_else(|| {
                GithubDataError::Validation("created pull request missing number".to_string())
            })?;
            context.pr_number_map.insert(pr.number, new_number);
            count += 1;
        }
        Ok(count)
    }
}

// --- Git repository (full clone mirror) -----------------------------

/// Mirrors the repository's git history via `ServiceBag::git`, independent
/// of every JSON-backed entity (spec §6 `GitService` contract). No
/// converter or storage file is involved; the clone itself lives at
/// `services.data_path.join("git-repo")`.
pub struct GitRepositorySave;

#[async_trait]
impl SaveStrategy for GitRepositorySave {
    fn entity_name(&self) -> &'static str {
        "git_repository"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let Some(git) = services.git else {
            tracing::warn!("no git service configured, skipping git_repository save");
            return Ok(0);
        };
        let url = services.api.clone_url(owner, repo);
        let target_path = services.data_path.join("git-repo");
        git.clone(&url, &target_path.to_string_lossy())?;
        Ok(1)
    }
}

pub struct GitRepositoryRestore;

#[async_trait]
impl RestoreStrategy for GitRepositoryRestore {
    fn entity_name(&self) -> &'static str {
        "git_repository"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let Some(git) = services.git else {
            tracing::warn!("no git service configured, skipping git_repository restore");
            return Ok(0);
        };
        let url = services.api.clone_url(owner, repo);
        let source_path = services.data_path.join("git-repo");
        git.restore(&source_path.to_string_lossy(), &url)?;
        Ok(1)
    }
}

// --- PR comments ------------------------------------------------------

pub struct PrCommentsSave;

#[async_trait]
impl SaveStrategy for PrCommentsSave {
    fn entity_name(&self) -> &'static str {
        "pr_comments"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let parent_numbers: BTreeSet<u64> = context.saved_parents.pull_requests().iter().map(|p| p.number).collect();

        let mut all_comments = Vec::new();
        for number in &parent_numbers {
            let raw = services.api.list_issue_comments(owner, repo, *number).await?;
            let comments: Vec<PrComment> = convert_all(services.converters, "convert_to_pr_comment", raw)?;
            all_comments.extend(comments);
        }

        let filtered = coupling::filter_by_parent(all_comments, &parent_numbers, "pr_comments", |c| c.pr_number);
        write_entities(services.storage, &filtered, "pr_comments.json")?;
        Ok(filtered.len())
    }
}

pub struct PrCommentsRestore;

#[async_trait]
impl RestoreStrategy for PrCommentsRestore {
    fn entity_name(&self) -> &'static str {
        "pr_comments"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let comments: Vec<PrComment> = read_entities(services.storage, "pr_comments.json")?;
        let mut count = 0;
        for comment in comments {
            let Some(new_pr_number) = context.map_pr(comment.pr_number) else {
                tracing::warn!(pr_number = comment.pr_number, "parent pull request not restored, skipping comment");
                continue;
            };
            let body = sanitize::append_metadata_footer(
                &sanitize::sanitize_mentions(&comment.body),
                &footer_fields(
                    &comment.author.login,
                    &comment.created_at.to_rfc3339(),
                    Some(&comment.updated_at.to_rfc3339()),
                    &comment.html_url,
                ),
            );
            services
                .api
                .create_issue_comment(owner, repo, new_pr_number, &json!({ "body": body }))
                .await?;
            count += 1;
        }
        Ok(count)
    }
}

// --- PR reviews ------------------------------------------------------

pub struct PrReviewsSave;

#[async_trait]
impl SaveStrategy for PrReviewsSave {
    fn entity_name(&self) -> &'static str {
        "pr_reviews"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let parent_numbers: BTreeSet<u64> = context.saved_parents.pull_requests().iter().map(|p| p.number).collect();

        let mut all_reviews = Vec::new();
        for number in &parent_numbers {
            let raw = services.api.list_pr_reviews(owner, repo, *number).await?;
            let reviews: Vec<PrReview> = convert_all(services.converters, "convert_to_pr_review", raw)?;
            all_reviews.extend(reviews);
        }

        let filtered = coupling::filter_by_parent(all_reviews, &parent_numbers, "pr_reviews", |r| r.pr_number);
        write_entities(services.storage, &filtered, "pr_reviews.json")?;
        context.saved_parents.record_reviews(filtered.clone());
        Ok(filtered.len())
    }
}

pub struct PrReviewsRestore;

#[async_trait]
impl RestoreStrategy for PrReviewsRestore {
    fn entity_name(&self) -> &'static str {
        "pr_reviews"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let reviews: Vec<PrReview> = read_entities(services.storage, "pr_reviews.json")?;
        let mut count = 0;
        for review in reviews {
            let Some(new_pr_number) = context.map_pr(review.pr_number) else {
                tracing::warn!(pr_number = review.pr_number, "parent pull request not restored, skipping review");
                continue;
            };
            let body = json!({
                "body": sanitize::sanitize_mentions(&review.body),
                "event": match review.state {
                    ReviewState::Approved => "APPROVE",
                    ReviewState::ChangesRequested => "REQUEST_CHANGES",
                    ReviewState::Commented => "COMMENT",
                },
            });
            let created = services.api.create_pr_review(owner, repo, new_pr_number, &body).await?;
            let new_id = created["id"].as_u64().ok_or_else(|| {
                GithubDataError::Validation("created review missing id".to_string())
            })?;
            context.review_id_map.insert(review.id, new_id);
            count += 1;
        }
        Ok(count)
    }
}

// --- PR review comments -------------------------------------------------

pub struct PrReviewCommentsSave;

#[async_trait]
impl SaveStrategy for PrReviewCommentsSave {
    fn entity_name(&self) -> &'static str {
        "pr_review_comments"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let pr_numbers: BTreeSet<u64> = context.saved_parents.pull_requests().iter().map(|p| p.number).collect();
        let review_ids: BTreeSet<u64> = context.saved_parents.reviews().iter().map(|r| r.id).collect();

        let mut all_comments = Vec::new();
        for number in &pr_numbers {
            let raw = services.api.list_pr_review_comments(owner, repo, *number).await?;
            let comments: Vec<PrReviewComment> = convert_all(services.converters, "convert_to_pr_review_comment", raw)?;
            all_comments.extend(comments);
        }

        let filtered = coupling::filter_by_parent(all_comments, &review_ids, "pr_review_comments", |c| c.review_id);
        write_entities(services.storage, &filtered, "pr_review_comments.json")?;
        Ok(filtered.len())
    }
}

pub struct PrReviewCommentsRestore;

#[async_trait]
impl RestoreStrategy for PrReviewCommentsRestore {
    fn entity_name(&self) -> &'static str {
        "pr_review_comments"
    }

    /// Implements the REST call directly rather than the
    /// `NotImplementedError` mock the source leaves in place (spec §9 Open
    /// Question: "implement the REST call (preferred)").
    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let mut comments: Vec<PrReviewComment> = read_entities(services.storage, "pr_review_comments.json")?;
        comments.sort_by_key(|c| c.in_reply_to_id.is_some());

        let mut count = 0;
        let mut reply_id_map: std::collections::HashMap<u64, u64> = std::collections::HashMap::new();
        for comment in comments {
            let Some(new_pr_number) = context.map_pr(comment.pr_number) else {
                tracing::warn!(pr_number = comment.pr_number, "parent pull request not restored, skipping review comment");
                continue;
            };
            if context.map_review(comment.review_id).is_none() {
                tracing::warn!(review_id = comment.review_id, "parent review not restored, skipping review comment");
                continue;
            }

            let mut body = json!({
                "body": sanitize::sanitize_mentions(&comment.body),
                "path": comment.path,
                "line": comment.line,
            });
            if let Some(old_parent) = comment.in_reply_to_id
                && let Some(new_parent) = reply_id_map.get(&old_parent)
            {
                body["in_reply_to"] = json!(new_parent);
            }

            let created = services
                .api
                .create_pr_review_comment(owner, repo, new_pr_number, &body)
                .await?;
            if let Some(new_id) = created["id"].as_u64() {
                reply_id_map.insert(comment.id, new_id);
            }
            count += 1;
        }
        Ok(count)
    }
}

// --- Releases --------------------------------------------------------

pub struct ReleasesSave;

#[async_trait]
impl SaveStrategy for ReleasesSave {
    fn entity_name(&self) -> &'static str {
        "releases"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _enablement: &Enablement,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let raw = services.api.list_releases(owner, repo).await?;
        let mut releases: Vec<Release> = convert_all(services.converters, "convert_to_release", raw)?;

        for release in &mut releases {
            let mut seen_names = std::collections::HashSet::new();
            for asset in &mut release.assets {
                if !seen_names.insert(asset.name.clone()) {
                    return Err(GithubDataError::Integrity(format!(
                        "duplicate asset name '{}' within release '{}'",
                        asset.name, release.tag_name
                    )));
                }
                let bytes = services.api.download_asset(&asset.download_url).await?;
                let local_path = format!("release-assets/{}/{}", release.tag_name, asset.name);
                services.storage.write_bytes(&bytes, &local_path)?;
                asset.local_path = Some(local_path);
            }
        }

        write_entities(services.storage, &releases, "releases.json")?;
        Ok(releases.len())
    }
}

pub struct ReleasesRestore;

#[async_trait]
impl RestoreStrategy for ReleasesRestore {
    fn entity_name(&self) -> &'static str {
        "releases"
    }

    async fn run(
        &self,
        services: &ServiceBag<'_>,
        owner: &str,
        repo: &str,
        _context: &mut Context,
    ) -> Result<usize, GithubDataError> {
        let releases: Vec<Release> = read_entities(services.storage, "releases.json")?;
        let mut count = 0;
        for release in releases {
            let body = json!({
                "tag_name": release.tag_name,
                "target_commitish": release.target_commitish,
                "draft": release.draft,
                "prerelease": release.prerelease,
                "body": sanitize::sanitize_mentions(&release.body),
            });
            let created = services.api.create_release(owner, repo, &body).await?;
            let upload_url = created["upload_url"].as_str().unwrap_or_default().to_string();
            for asset in &release.assets {
                if let Some(local_path) = &asset.local_path {
                    let bytes = services.storage.read_bytes(local_path)?;
                    services
                        .api
                        .upload_release_asset(&upload_url, &asset.name, &asset.content_type, bytes.into())
                        .await?;
                }
            }
            count += 1;
        }
        Ok(count)
    }
}
