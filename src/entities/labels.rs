use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "labels",
        env_var: "INCLUDE_LABELS",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &[],
    }
}
