//! Label conflict resolution (spec §4.4 "Label conflict resolution").
//!
//! Grounded in `operations/restore/strategies/conflict/{base,strategies,
//! factory}.py`: a strategy object per `ConflictStrategy` variant,
//! `resolve(existing, incoming) -> Outcome`. `merge`/`rename` semantics were
//! left underspecified there (spec §9 Open Question); this module decides:
//! `merge` keeps the incoming value for any non-empty field and falls back
//! to the existing value otherwise; `rename` suffixes the incoming label's
//! name with `-restored-N`, the smallest N for which that name doesn't
//! collide with an existing label.

use crate::context::ConflictStrategy;
use crate::models::Label;

/// What the restore strategy should do about one incoming label, given
/// whatever label of the same name already exists on the target repo (if
/// any).
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; keep the existing label as-is.
    Skip,
    /// Create the incoming label fresh (no conflict, or `fail_if_conflict`
    /// never candidates this name).
    Create(Label),
    /// Update the existing label in place to these attributes.
    Update(Label),
    /// The run must stop: a conflicting label exists and the strategy is
    /// `fail_if_conflict`.
    Fail(String),
}

/// Resolves a potential conflict between `incoming` (about to be restored)
/// and `existing` (already present on the target, by matching name, if
/// any). `all_existing_names` is needed by `rename` to find a free suffix.
pub fn resolve(
    strategy: ConflictStrategy,
    incoming: Label,
    existing: Option<&Label>,
    all_existing_names: &[String],
) -> Outcome {
    let Some(existing) = existing else {
        return Outcome::Create(incoming);
    };

    match strategy {
        ConflictStrategy::Skip => Outcome::Skip,
        ConflictStrategy::Overwrite => Outcome::Update(Label { id: existing.id, ..incoming }),
        ConflictStrategy::FailIfConflict => Outcome::Fail(format!(
            "label '{}' already exists on target repository",
            incoming.name
        )),
        ConflictStrategy::Merge => Outcome::Update(merge(existing, &incoming)),
        ConflictStrategy::Rename => Outcome::Create(rename(incoming, all_existing_names)),
    }
}

fn merge(existing: &Label, incoming: &Label) -> Label {
    Label {
        id: existing.id,
        name: existing.name.clone(),
        color: if incoming.color.is_empty() { existing.color.clone() } else { incoming.color.clone() },
        description: match &incoming.description {
            Some(d) if !d.is_empty() => Some(d.clone()),
            _ => existing.description.clone(),
        },
    }
}

fn rename(mut incoming: Label, all_existing_names: &[String]) -> Label {
    let base = incoming.name.clone();
    let mut n = 1;
    loop {
        let candidate = format!("{base}-restored-{n}");
        if !all_existing_names.iter().any(|name| name == &candidate) {
            incoming.name = candidate;
            return incoming;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str, color: &str, description: Option<&str>) -> Label {
        Label {
            id: 1,
            name: name.to_string(),
            color: color.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn no_existing_label_always_creates() {
        let incoming = label("bug", "ff0000", None);
        assert_eq!(
            resolve(ConflictStrategy::FailIfConflict, incoming.clone(), None, &[]),
            Outcome::Create(incoming)
        );
    }

    #[test]
    fn skip_keeps_existing() {
        let existing = label("bug", "ff0000", None);
        let incoming = label("bug", "00ff00", Some("new"));
        assert_eq!(resolve(ConflictStrategy::Skip, incoming, Some(&existing), &[]), Outcome::Skip);
    }

    #[test]
    fn fail_if_conflict_returns_an_error() {
        let existing = label("bug", "ff0000", None);
        let incoming = label("bug", "00ff00", None);
        assert!(matches!(
            resolve(ConflictStrategy::FailIfConflict, incoming, Some(&existing), &[]),
            Outcome::Fail(_)
        ));
    }

    #[test]
    fn merge_prefers_incoming_non_empty_fields() {
        let existing = label("bug", "ff0000", Some("old description"));
        let incoming = label("bug", "", Some(""));
        let Outcome::Update(merged) = resolve(ConflictStrategy::Merge, incoming, Some(&existing), &[]) else {
            panic!("expected Update");
        };
        assert_eq!(merged.color, "ff0000");
        assert_eq!(merged.description.as_deref(), Some("old description"));
    }

    #[test]
    fn rename_finds_smallest_free_suffix() {
        let existing = label("bug", "ff0000", None);
        let incoming = label("bug", "00ff00", None);
        let taken = vec!["bug-restored-1".to_string()];
        let Outcome::Create(renamed) = resolve(ConflictStrategy::Rename, incoming, Some(&existing), &taken) else {
            panic!("expected Create");
        };
        assert_eq!(renamed.name, "bug-restored-2");
    }
}
