//! Parsing for the selective entity number-specification grammar and the
//! boolean enablement grammar used to configure which entities (and which
//! issue/PR numbers within an entity) a save or restore run processes.
//!
//! Both parsers are pure: no I/O, no environment access. The caller (the
//! Entity Registry) is responsible for reading the raw string out of the
//! environment and handing it to [`parse_enablement`].

mod error;
mod number_set;

pub use error::InvalidSpecification;
pub use number_set::parse as parse_number_spec;

use std::collections::BTreeSet;

/// The parsed enablement value for one entity, as read from its env var.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enablement {
    /// Entity is uniformly enabled or disabled.
    Bool(bool),
    /// Entity is enabled for only the given positive issue/PR numbers.
    Numbers(BTreeSet<u64>),
}

impl Enablement {
    /// Whether the entity should run at all (a non-empty selection set
    /// always implies "run", filtering happens downstream).
    pub fn is_enabled(&self) -> bool {
        match self {
            Enablement::Bool(b) => *b,
            Enablement::Numbers(set) => !set.is_empty(),
        }
    }
}

/// Parses a boolean enablement string.
///
/// Accepts (case-insensitively): `true`/`false`, `yes`/`no`, `on`/`off`.
pub fn parse_boolean(value: &str) -> Result<bool, InvalidSpecification> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        other => Err(InvalidSpecification::NotBoolean(other.to_string())),
    }
}

/// Dispatches between the boolean grammar and the number-specification
/// grammar. The boolean form is tried first, so that a hypothetical entity
/// numbered "true" never shadows the literal boolean `true`.
pub fn parse_enablement(value: &str) -> Result<Enablement, InvalidSpecification> {
    if let Ok(b) = parse_boolean(value) {
        return Ok(Enablement::Bool(b));
    }
    number_set::parse(value).map(Enablement::Numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_forms() {
        for s in ["true", "True", "YES", "on", "ON"] {
            assert_eq!(parse_boolean(s).unwrap(), true, "{s}");
        }
        for s in ["false", "No", "OFF"] {
            assert_eq!(parse_boolean(s).unwrap(), false, "{s}");
        }
        assert!(parse_boolean("maybe").is_err());
    }

    #[test]
    fn dispatch_prefers_boolean() {
        assert_eq!(parse_enablement("true").unwrap(), Enablement::Bool(true));
        assert_eq!(parse_enablement("off").unwrap(), Enablement::Bool(false));
        assert_eq!(
            parse_enablement("1-3,5").unwrap(),
            Enablement::Numbers(BTreeSet::from([1, 2, 3, 5]))
        );
    }

    #[test]
    fn empty_selection_is_disabled() {
        assert!(!Enablement::Numbers(BTreeSet::new()).is_enabled());
        assert!(Enablement::Numbers(BTreeSet::from([5])).is_enabled());
    }
}
