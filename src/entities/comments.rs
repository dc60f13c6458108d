use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "comments",
        env_var: "INCLUDE_COMMENTS",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &["issues"],
    }
}
