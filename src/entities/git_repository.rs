use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

/// The Git repository itself (spec §6 "git-repo/"). Out of the API
/// Mediator's scope entirely — its save/restore strategies delegate to the
/// external `GitService` (see `git.rs`), not to `github::GithubClient`.
pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "git_repository",
        env_var: "INCLUDE_GIT_REPOSITORY",
        value_type: ValueType::Bool,
        default: Enablement::Bool(false),
        dependencies: &[],
    }
}
