//! Strategy factory (spec §4.5 step 4: "instantiate its strategy").
//!
//! A name-keyed lookup from `EntityRegistry`'s declarations to the concrete
//! `impls.rs` structs, mirroring the way the Python source's
//! `StrategyFactory` turns an entity name into a strategy instance without
//! the caller needing to know the concrete type.

use super::impls::*;
use super::{RestoreStrategy, SaveStrategy};
use crate::errors::GithubDataError;

pub fn save_strategy(entity_name: &str) -> Result<Box<dyn SaveStrategy>, GithubDataError> {
    let strategy: Box<dyn SaveStrategy> = match entity_name {
        "labels" => Box::new(LabelsSave),
        "milestones" => Box::new(MilestonesSave),
        "issues" => Box::new(IssuesSave),
        "comments" => Box::new(CommentsSave),
        "sub_issues" => Box::new(SubIssuesSave),
        "pull_requests" => Box::new(PullRequestsSave),
        "pr_comments" => Box::new(PrCommentsSave),
        "pr_reviews" => Box::new(PrReviewsSave),
        "pr_review_comments" => Box::new(PrReviewCommentsSave),
        "releases" => Box::new(ReleasesSave),
        "git_repository" => Box::new(GitRepositorySave),
        other => return Err(unknown_entity(other)),
    };
    Ok(strategy)
}

pub fn restore_strategy(entity_name: &str) -> Result<Box<dyn RestoreStrategy>, GithubDataError> {
    let strategy: Box<dyn RestoreStrategy> = match entity_name {
        "labels" => Box::new(LabelsRestore),
        "milestones" => Box::new(MilestonesRestore),
        "issues" => Box::new(IssuesRestore),
        "comments" => Box::new(CommentsRestore),
        "sub_issues" => Box::new(SubIssuesRestore),
        "pull_requests" => Box::new(PullRequestsRestore),
        "pr_comments" => Box::new(PrCommentsRestore),
        "pr_reviews" => Box::new(PrReviewsRestore),
        "pr_review_comments" => Box::new(PrReviewCommentsRestore),
        "releases" => Box::new(ReleasesRestore),
        "git_repository" => Box::new(GitRepositoryRestore),
        other => return Err(unknown_entity(other)),
    };
    Ok(strategy)
}

fn unknown_entity(name: &str) -> GithubDataError {
    GithubDataError::Config(format!("no strategy registered for entity '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ENTITIES: &[&str] = &[
        "labels",
        "milestones",
        "issues",
        "comments",
        "sub_issues",
        "pull_requests",
        "pr_comments",
        "pr_reviews",
        "pr_review_comments",
        "releases",
        "git_repository",
    ];

    #[test]
    fn every_declared_entity_has_a_save_and_restore_strategy() {
        for name in ALL_ENTITIES {
            assert!(save_strategy(name).is_ok(), "missing save strategy for {name}");
            assert!(restore_strategy(name).is_ok(), "missing restore strategy for {name}");
        }
    }

    #[test]
    fn unknown_entity_name_is_a_config_error() {
        assert!(matches!(save_strategy("bogus"), Err(GithubDataError::Config(_))));
    }
}
