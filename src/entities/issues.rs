use number_spec::Enablement;

use super::{EntityDeclaration, ValueType};

/// Issues accept either a boolean or a selection set (spec §4.4 "Selective
/// filtering"); `milestones` is a dependency even though the reference is
/// "soft" at the data level (spec §3), because disabling milestones
/// cascades to issues per spec §8 scenario 2.
pub fn declaration() -> EntityDeclaration {
    EntityDeclaration {
        name: "issues",
        env_var: "INCLUDE_ISSUES",
        value_type: ValueType::SelectionSet,
        default: Enablement::Bool(true),
        dependencies: &["milestones"],
    }
}
