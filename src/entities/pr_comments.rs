use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "pr_comments",
        env_var: "INCLUDE_PR_COMMENTS",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &["pull_requests"],
    }
}
