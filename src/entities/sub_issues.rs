use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "sub_issues",
        env_var: "INCLUDE_SUB_ISSUES",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &["issues"],
    }
}
