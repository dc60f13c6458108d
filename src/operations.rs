//! Operation Registry (spec §4.2/§4.3): metadata about each GitHub API
//! operation an entity declares — which boundary method it calls, which
//! converter (if any) turns its response into a domain model, and whether
//! it's safe to serve from the read cache.
//!
//! Grounded in `github_data_tools/github/operation_registry.py`
//! (`Operation`, `GitHubOperationRegistry`, their test suite's write-prefix
//! list) — read/write classification is purely name-based: a handful of
//! mutating-verb prefixes mark an operation as a write, everything else is
//! assumed cacheable.

use std::collections::HashMap;

use crate::cache::cache_key;
use crate::converters::ConverterRegistry;
use crate::errors::GithubDataError;

/// Verb prefixes that mark a `boundary_method` as mutating. Matches the
/// teacher corpus's convention of naming REST wrappers after the HTTP verb
/// they perform (`create_label`, `update_issue`, `delete_label`, ...).
const WRITE_PREFIXES: &[&str] = &["create_", "update_", "delete_", "close_", "upload_", "add_"];

#[derive(Debug, Clone)]
pub struct Operation {
    pub method_name: String,
    pub entity_name: String,
    pub boundary_method: String,
    pub converter_name: Option<String>,
    pub cache_key_template: Option<String>,
}

impl Operation {
    pub fn new(
        method_name: impl Into<String>,
        entity_name: impl Into<String>,
        boundary_method: impl Into<String>,
    ) -> Self {
        Operation {
            method_name: method_name.into(),
            entity_name: entity_name.into(),
            boundary_method: boundary_method.into(),
            converter_name: None,
            cache_key_template: None,
        }
    }

    pub fn with_converter(mut self, converter_name: impl Into<String>) -> Self {
        self.converter_name = Some(converter_name.into());
        self
    }

    pub fn with_cache_key_template(mut self, template: impl Into<String>) -> Self {
        self.cache_key_template = Some(template.into());
        self
    }

    /// Read operations are cached, write operations always hit the network.
    pub fn should_cache(&self) -> bool {
        !WRITE_PREFIXES
            .iter()
            .any(|prefix| self.boundary_method.starts_with(prefix))
    }

    /// Builds the cache key for a call with the given params, sorted by
    /// param name for order-independence, or using `cache_key_template` with
    /// `{param}` substitution when one is declared.
    pub fn get_cache_key(&self, params: &[(&str, &str)]) -> String {
        if let Some(template) = &self.cache_key_template {
            let mut key = template.clone();
            for (name, value) in params {
                key = key.replace(&format!("{{{name}}}"), value);
            }
            key
        } else {
            cache_key(&self.boundary_method, params)
        }
    }

    fn validate(&self, converters: &ConverterRegistry) -> Result<(), GithubDataError> {
        if let Some(converter_name) = &self.converter_name {
            converters.get(converter_name).map_err(|_| {
                GithubDataError::Config(format!(
                    "invalid operation spec for '{}': converter '{}' not found",
                    self.method_name, converter_name
                ))
            })?;
        }
        Ok(())
    }
}

/// Registry of every GitHub API operation declared by the entity set,
/// validated at startup against the `ConverterRegistry` so a typo in an
/// entity declaration fails fast instead of at first use.
pub struct OperationRegistry {
    operations: HashMap<String, Operation>,
}

impl OperationRegistry {
    pub fn new(
        declared: Vec<Operation>,
        converters: &ConverterRegistry,
    ) -> Result<Self, GithubDataError> {
        let mut operations = HashMap::new();
        for op in declared {
            op.validate(converters)?;
            operations.insert(op.method_name.clone(), op);
        }
        Ok(OperationRegistry { operations })
    }

    pub fn get(&self, method_name: &str) -> Option<&Operation> {
        self.operations.get(method_name)
    }

    pub fn list_operations(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }
}

/// Every GitHub API operation this engine's strategies call, declared once
/// so `OperationRegistry::new` can cross-validate them against the
/// `ConverterRegistry` at startup (spec §4.3's load-time cross-validation
/// step). `rest.rs`/`graphql.rs` remain the actual call sites; this list is
/// the introspectable catalog of what they call, not a dispatch layer.
pub fn declared_operations() -> Vec<Operation> {
    vec![
        Operation::new("list_labels", "labels", "list_labels").with_converter("convert_to_label"),
        Operation::new("create_label", "labels", "create_label"),
        Operation::new("update_label", "labels", "update_label"),
        Operation::new("delete_label", "labels", "delete_label"),
        Operation::new("list_milestones", "milestones", "list_milestones").with_converter("convert_to_milestone"),
        Operation::new("create_milestone", "milestones", "create_milestone"),
        Operation::new("list_issues", "issues", "list_issues").with_converter("convert_to_issue"),
        Operation::new("get_issue", "issues", "get_issue"),
        Operation::new("create_issue", "issues", "create_issue"),
        Operation::new("update_issue", "issues", "update_issue"),
        Operation::new("add_sub_issue", "sub_issues", "add_sub_issue"),
        Operation::new("list_sub_issues", "sub_issues", "list_sub_issues"),
        Operation::new("list_issue_comments", "comments", "list_issue_comments").with_converter("convert_to_comment"),
        Operation::new("create_issue_comment", "comments", "create_issue_comment"),
        Operation::new("list_pull_requests", "pull_requests", "list_pull_requests")
            .with_converter("convert_to_pull_request"),
        Operation::new("create_pull_request", "pull_requests", "create_pull_request"),
        Operation::new("list_pr_reviews", "pr_reviews", "list_pr_reviews").with_converter("convert_to_pr_review"),
        Operation::new("create_pr_review", "pr_reviews", "create_pr_review"),
        Operation::new("list_pr_review_comments", "pr_review_comments", "list_pr_review_comments")
            .with_converter("convert_to_pr_review_comment"),
        Operation::new("create_pr_review_comment", "pr_review_comments", "create_pr_review_comment"),
        Operation::new("list_releases", "releases", "list_releases").with_converter("convert_to_release"),
        Operation::new("create_release", "releases", "create_release"),
        Operation::new("download_asset", "releases", "download_asset"),
        Operation::new("upload_release_asset", "releases", "upload_release_asset"),
        Operation::new("get_repository", "git_repository", "get_repository"),
        Operation::new("create_repository", "git_repository", "create_repository"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_operations_are_not_cached() {
        let op = Operation::new("create_release", "releases", "create_release");
        assert!(!op.should_cache());
        let op = Operation::new("get_repository_releases", "releases", "get_repository_releases");
        assert!(op.should_cache());
    }

    #[test]
    fn cache_key_is_order_independent() {
        let op = Operation::new("get_issue_comments", "comments", "get_issue_comments");
        let a = op.get_cache_key(&[("repo_name", "owner/repo"), ("issue_number", "123")]);
        let b = op.get_cache_key(&[("issue_number", "123"), ("repo_name", "owner/repo")]);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_template_overrides_auto_generation() {
        let op = Operation::new("get_repository_releases", "releases", "get_repository_releases")
            .with_cache_key_template("releases:{repo_name}");
        assert_eq!(
            op.get_cache_key(&[("repo_name", "owner/repo")]),
            "releases:owner/repo"
        );
    }

    #[test]
    fn registry_rejects_unknown_converter() {
        let converters = ConverterRegistry::new().unwrap();
        let declared = vec![
            Operation::new("get_repository_releases", "releases", "get_repository_releases")
                .with_converter("nonexistent_converter"),
        ];
        let err = OperationRegistry::new(declared, &converters).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn declared_operations_cross_validate_against_converters() {
        let converters = ConverterRegistry::new().unwrap();
        let registry = OperationRegistry::new(declared_operations(), &converters).unwrap();
        assert!(registry.get("list_labels").is_some());
    }

    #[test]
    fn registry_accepts_valid_converter() {
        let converters = ConverterRegistry::new().unwrap();
        let declared = vec![
            Operation::new("get_repository_releases", "releases", "get_repository_releases")
                .with_converter("convert_to_release"),
        ];
        let registry = OperationRegistry::new(declared, &converters).unwrap();
        assert!(registry.get("get_repository_releases").is_some());
    }
}
