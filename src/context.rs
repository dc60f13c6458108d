//! The run-scoped mutable `Context` (spec §3 "Context", §4.4 mixins).
//!
//! Single-threaded within a run: entities are processed strictly in
//! topological order (spec §5), so no synchronization is needed here,
//! matching the teacher's own note in `cache.rs` that its LRU cache is a
//! plain, unsynchronized structure used from one task at a time.

use std::collections::HashMap;

use crate::models::{Issue, PrReview, PullRequest};

/// Per-run label conflict resolution mode (spec §4.4 "Label conflict
/// resolution").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    #[default]
    Skip,
    Overwrite,
    FailIfConflict,
    Merge,
    Rename,
}

impl std::str::FromStr for ConflictStrategy {
    type Err = crate::errors::GithubDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "skip" => Ok(ConflictStrategy::Skip),
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            "fail_if_conflict" => Ok(ConflictStrategy::FailIfConflict),
            "merge" => Ok(ConflictStrategy::Merge),
            "rename" => Ok(ConflictStrategy::Rename),
            other => Err(crate::errors::GithubDataError::Config(format!(
                "unknown label conflict strategy '{other}'"
            ))),
        }
    }
}

/// Parent entities saved during this run, keyed by entity name, used by the
/// parent-child coupling mixin (spec §4.4).
#[derive(Debug, Default)]
pub struct SavedParents {
    issues: Vec<Issue>,
    pull_requests: Vec<PullRequest>,
    reviews: Vec<PrReview>,
}

impl SavedParents {
    pub fn record_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
    }

    pub fn record_pull_requests(&mut self, prs: Vec<PullRequest>) {
        self.pull_requests = prs;
    }

    pub fn record_reviews(&mut self, reviews: Vec<PrReview>) {
        self.reviews = reviews;
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    pub fn reviews(&self) -> &[PrReview] {
        &self.reviews
    }
}

/// Run-scoped mutable record of cross-entity mappings and flags.
#[derive(Debug, Default)]
pub struct Context {
    pub milestone_number_map: HashMap<u64, u64>,
    pub issue_number_map: HashMap<u64, u64>,
    pub pr_number_map: HashMap<u64, u64>,
    pub review_id_map: HashMap<u64, u64>,
    pub saved_parents: SavedParents,
    pub include_original_metadata: bool,
    pub conflict_strategy: ConflictStrategy,
}

impl Context {
    pub fn new(include_original_metadata: bool, conflict_strategy: ConflictStrategy) -> Self {
        Context {
            include_original_metadata,
            conflict_strategy,
            ..Default::default()
        }
    }

    /// Maps an old milestone number to its restored number, warning (not
    /// failing) when the milestone wasn't saved/restored in this run (spec
    /// §3 invariant: dropped, never fatal).
    pub fn map_milestone(&self, old_number: u64) -> Option<u64> {
        self.milestone_number_map.get(&old_number).copied()
    }

    pub fn map_issue(&self, old_number: u64) -> Option<u64> {
        self.issue_number_map.get(&old_number).copied()
    }

    pub fn map_pr(&self, old_number: u64) -> Option<u64> {
        self.pr_number_map.get(&old_number).copied()
    }

    pub fn map_review(&self, old_id: u64) -> Option<u64> {
        self.review_id_map.get(&old_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijection_round_trips_through_the_map() {
        let mut ctx = Context::new(false, ConflictStrategy::Skip);
        ctx.issue_number_map.insert(5, 105);
        assert_eq!(ctx.map_issue(5), Some(105));
        assert_eq!(ctx.map_issue(6), None);
    }

    #[test]
    fn conflict_strategy_parses_known_values() {
        assert_eq!("skip".parse::<ConflictStrategy>().unwrap(), ConflictStrategy::Skip);
        assert_eq!(
            "fail_if_conflict".parse::<ConflictStrategy>().unwrap(),
            ConflictStrategy::FailIfConflict
        );
        assert!("clobber".parse::<ConflictStrategy>().is_err());
    }
}
