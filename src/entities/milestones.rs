use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "milestones",
        env_var: "INCLUDE_MILESTONES",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &[],
    }
}
