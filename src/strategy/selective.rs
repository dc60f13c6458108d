//! Selective filtering (spec §4.4 "Selective filtering" mixin).
//!
//! Grounded in `operations/save/mixins/selective_filtering.py`: a boolean
//! enablement keeps or drops everything, a selection set keeps only the
//! matching numbers and warns about any requested number that wasn't found.

use number_spec::Enablement;
use tracing::warn;

/// Filters `entities` by `enablement`, using `number_of` to extract each
/// entity's numeric identifier. Mirrors
/// `SelectiveFilteringMixin.apply_selective_filtering`.
pub fn apply<T>(entities: Vec<T>, enablement: &Enablement, entity_name: &str, number_of: impl Fn(&T) -> u64) -> Vec<T> {
    match enablement {
        Enablement::Bool(true) => entities,
        Enablement::Bool(false) => Vec::new(),
        Enablement::Numbers(wanted) => {
            let found: std::collections::BTreeSet<u64> =
                entities.iter().map(&number_of).filter(|n| wanted.contains(n)).collect();
            let missing: Vec<u64> = wanted.difference(&found).copied().collect();
            if !missing.is_empty() {
                warn!(entity_name, ?missing, "requested numbers not found in repository");
            }
            let filtered: Vec<T> = entities.into_iter().filter(|e| wanted.contains(&number_of(e))).collect();
            tracing::info!(
                entity_name,
                selected = filtered.len(),
                "selected entities by number"
            );
            filtered
        }
    }
}
