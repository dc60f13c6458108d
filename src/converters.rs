//! Converter Registry (spec §4.3): turns raw GitHub API JSON into the
//! canonical domain shapes in `models.rs`, resolved by name so entity
//! declarations can reference converters without introducing a module
//! dependency cycle.
//!
//! Grounded in `github_data_tools/github/converter_registry.py`: eager
//! construction, fail-fast collision detection, and a "did you mean"
//! suggestion on lookup miss. Rust has no dynamic module import, so
//! "loading" here just means registering the crate's own `fn` items; the
//! collision check still matters because two entity declarations could
//! claim the same converter name by mistake.

use std::collections::HashMap;

use serde_json::Value;

use crate::errors::GithubDataError;
use crate::models::{
    Comment, Issue, Label, Milestone, PrComment, PrReview, PrReviewComment, PullRequest, Release,
    ReleaseAsset, SubIssueEdge,
};

pub type ConverterFn = fn(&Value) -> Result<Value, GithubDataError>;

macro_rules! converter {
    ($name:ident, $model:ty) => {
        pub fn $name(raw: &Value) -> Result<Value, GithubDataError> {
            let model: $model = serde_path_to_error::deserialize(raw).map_err(|e| {
                GithubDataError::Validation(format!("{}: {e}", stringify!($name)))
            })?;
            serde_json::to_value(model).map_err(|e| GithubDataError::Validation(e.to_string()))
        }
    };
}

converter!(convert_to_label, Label);
converter!(convert_to_milestone, Milestone);
converter!(convert_to_issue, Issue);
converter!(convert_to_comment, Comment);
converter!(convert_to_sub_issue_edge, SubIssueEdge);
converter!(convert_to_pull_request, PullRequest);
converter!(convert_to_pr_comment, PrComment);
converter!(convert_to_pr_review, PrReview);
converter!(convert_to_pr_review_comment, PrReviewComment);
converter!(convert_to_release, Release);
converter!(convert_to_release_asset, ReleaseAsset);

/// Registry mapping converter names (as declared by entities) to the
/// functions above. Construction is fail-fast: a name registered twice is a
/// configuration error, not silently overwritten.
pub struct ConverterRegistry {
    converters: HashMap<&'static str, ConverterFn>,
}

impl ConverterRegistry {
    pub fn new() -> Result<Self, GithubDataError> {
        let declarations: &[(&'static str, ConverterFn)] = &[
            ("convert_to_label", convert_to_label),
            ("convert_to_milestone", convert_to_milestone),
            ("convert_to_issue", convert_to_issue),
            ("convert_to_comment", convert_to_comment),
            ("convert_to_sub_issue_edge", convert_to_sub_issue_edge),
            ("convert_to_pull_request", convert_to_pull_request),
            ("convert_to_pr_comment", convert_to_pr_comment),
            ("convert_to_pr_review", convert_to_pr_review),
            ("convert_to_pr_review_comment", convert_to_pr_review_comment),
            ("convert_to_release", convert_to_release),
            ("convert_to_release_asset", convert_to_release_asset),
        ];

        let mut converters = HashMap::new();
        for (name, func) in declarations {
            if converters.insert(*name, *func).is_some() {
                return Err(GithubDataError::Config(format!(
                    "converter naming collision: '{name}' registered twice"
                )));
            }
        }
        Ok(ConverterRegistry { converters })
    }

    pub fn get(&self, name: &str) -> Result<ConverterFn, GithubDataError> {
        self.converters.get(name).copied().ok_or_else(|| {
            let mut message = format!("converter '{name}' not found");
            if let Some(suggestion) = closest_match(name, self.converters.keys().copied()) {
                message.push_str(&format!(". Did you mean: {suggestion}?"));
            }
            GithubDataError::Config(message)
        })
    }

    pub fn list(&self) -> Vec<&'static str> {
        self.converters.keys().copied().collect()
    }
}

/// Finds the candidate with the smallest Levenshtein distance to `name`,
/// for a "did you mean" suggestion (spec §7 error messages), mirroring
/// `difflib.get_close_matches` without pulling in a fuzzy-matching crate.
fn closest_match<'a>(name: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|c| (levenshtein(name, c), c))
        .min_by_key(|(dist, _)| *dist)
        .filter(|(dist, _)| *dist <= 4)
        .map(|(_, c)| c)
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut prev = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let cur = row[j];
            row[j] = if a[i - 1] == b[j - 1] {
                prev
            } else {
                1 + prev.min(row[j]).min(row[j - 1])
            };
            prev = cur;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_has_no_collisions_and_resolves_by_name() {
        let registry = ConverterRegistry::new().unwrap();
        assert!(registry.get("convert_to_label").is_ok());
        assert_eq!(registry.list().len(), 11);
    }

    #[test]
    fn unknown_converter_suggests_a_close_match() {
        let registry = ConverterRegistry::new().unwrap();
        let err = registry.get("convert_to_labell").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Did you mean"));
    }

    #[test]
    fn convert_to_label_validates_shape() {
        let raw = json!({
            "id": 1,
            "name": "bug",
            "color": "ff0000",
            "description": null,
        });
        let converted = convert_to_label(&raw).unwrap();
        assert_eq!(converted["name"], "bug");
    }

    #[test]
    fn convert_to_label_rejects_missing_fields() {
        let raw = json!({ "id": 1 });
        assert!(convert_to_label(&raw).is_err());
    }
}
