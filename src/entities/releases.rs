use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "releases",
        env_var: "INCLUDE_RELEASES",
        value_type: ValueType::Bool,
        default: Enablement::Bool(true),
        dependencies: &[],
    }
}
