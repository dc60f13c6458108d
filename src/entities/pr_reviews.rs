use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "pr_reviews",
        env_var: "INCLUDE_PR_REVIEWS",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &["pull_requests"],
    }
}
