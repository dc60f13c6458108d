//! Parent-child entity coupling (spec §4.4 "Parent-child coupling" mixin).
//!
//! `entity_coupling.py` matches children to parents through several
//! identifier shapes (number, `html_url`, API path pattern, raw `url`)
//! because the Python source works with loosely-typed dicts pulled straight
//! off the API. This engine's converters already normalize a child's parent
//! reference down to a plain number (`issue_number`, `pr_number`,
//! `review_id`), so matching here only needs to compare against the set of
//! saved parent numbers — no URL-pattern reconstruction required.

use std::collections::BTreeSet;

use tracing::warn;

/// Filters `children` down to those whose parent number is in
/// `saved_parent_numbers`. If no parents were saved, every child is
/// dropped, matching `_handle_no_parents` in the Python mixin.
pub fn filter_by_parent<T>(
    children: Vec<T>,
    saved_parent_numbers: &BTreeSet<u64>,
    entity_name: &str,
    parent_number_of: impl Fn(&T) -> u64,
) -> Vec<T> {
    if saved_parent_numbers.is_empty() {
        if !children.is_empty() {
            warn!(entity_name, count = children.len(), "no saved parents, dropping all children");
        }
        return Vec::new();
    }

    let total = children.len();
    let filtered: Vec<T> = children
        .into_iter()
        .filter(|child| saved_parent_numbers.contains(&parent_number_of(child)))
        .collect();

    let dropped = total - filtered.len();
    if dropped > 0 {
        warn!(entity_name, dropped, "dropped children with no saved parent");
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_children_whose_parent_was_not_saved() {
        let parents = BTreeSet::from([1, 2]);
        let out = filter_by_parent(vec![(1, "a"), (3, "b")], &parents, "comments", |(p, _)| *p);
        assert_eq!(out, vec![(1, "a")]);
    }

    #[test]
    fn no_saved_parents_drops_everything() {
        let out: Vec<(u64, &str)> = filter_by_parent(vec![(1, "a")], &BTreeSet::new(), "comments", |(p, _)| *p);
        assert!(out.is_empty());
    }
}
