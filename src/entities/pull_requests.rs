use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "pull_requests",
        env_var: "INCLUDE_PULL_REQUESTS",
        value_type: ValueType::SelectionSet,
        default: Enablement::Bool(true),
        dependencies: &["milestones"],
    }
}
