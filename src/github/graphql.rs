//! Ad-hoc GraphQL queries (spec §4.1 "sub_issues" save operation).
//!
//! GitHub only exposes the parent/child sub-issue relationship and its
//! ordering position over GraphQL, so reading it has to go through
//! `GithubClient::graphql_query` rather than the REST surface in `rest.rs`.
//! Written as a raw query string the way the teacher's own
//! `graphql_query`/`graphql_query_with_errors` callers do, rather than typed
//! `cynic` derives, since those derives need a schema file this crate
//! doesn't carry.

use serde_json::json;

use crate::errors::GithubDataError;
use crate::github::client::GithubClient;
use crate::models::SubIssueEdge;

const SUB_ISSUES_QUERY: &str = r#"
query($owner: String!, $name: String!, $number: Int!, $after: String) {
  repository(owner: $owner, name: $name) {
    issue(number: $number) {
      subIssues(first: 100, after: $after) {
        nodes { number }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}
"#;

impl GithubClient {
    /// Lists the sub-issues of `parent_number`, in GitHub's stored order.
    pub async fn list_sub_issues(
        &self,
        owner: &str,
        name: &str,
        parent_number: u64,
    ) -> Result<Vec<SubIssueEdge>, GithubDataError> {
        let mut edges = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let result = self
                .graphql_query(
                    SUB_ISSUES_QUERY,
                    json!({
                        "owner": owner,
                        "name": name,
                        "number": parent_number,
                        "after": after,
                    }),
                )
                .await?;

            let connection = &result["data"]["repository"]["issue"]["subIssues"];
            let nodes = connection["nodes"].as_array().ok_or_else(|| {
                GithubDataError::Validation("malformed subIssues response".to_string())
            })?;

            for node in nodes {
                let sub_issue_number = node["number"].as_u64().ok_or_else(|| {
                    GithubDataError::Validation("sub-issue node missing number".to_string())
                })?;
                edges.push(SubIssueEdge {
                    parent_issue_number: parent_number,
                    sub_issue_number,
                    position: edges.len() as u32,
                });
            }

            if connection["pageInfo"]["hasNextPage"].as_bool().unwrap_or(false) {
                after = connection["pageInfo"]["endCursor"].as_str().map(str::to_string);
            } else {
                break;
            }
        }
        Ok(edges)
    }
}
