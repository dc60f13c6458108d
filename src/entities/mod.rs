//! Entity Registry (spec §4.3): declarations, enablement parsing, cascade
//! disable, and the topological ordering the Orchestrator drives.
//!
//! Grounded in `github_data_core/entities/registry.py`'s responsibilities,
//! reshaped into Rust: rather than scanning a directory of Python modules at
//! runtime, each entity's declaration is a plain `fn` in its own module
//! (`entities::labels::declaration()`, …), and `EntityRegistry::discover`
//! collects them into one static list — the "discovery" step the original
//! does with `importlib` becomes ordinary static dispatch.

pub mod comments;
pub mod git_repository;
pub mod issues;
pub mod milestones;
pub mod labels;
pub mod pr_comments;
pub mod pr_review_comments;
pub mod pr_reviews;
pub mod pull_requests;
pub mod releases;
pub mod sub_issues;

use std::collections::{HashMap, HashSet};

use number_spec::Enablement;

use crate::errors::GithubDataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    SelectionSet,
}

/// One entity kind's static declaration (spec §3 "Entity declaration").
/// Strategy factories live in `strategy::registry`, not here, to keep the
/// dependency graph free of a cycle back into the strategy layer.
#[derive(Debug, Clone)]
pub struct EntityDeclaration {
    pub name: &'static str,
    pub env_var: &'static str,
    pub value_type: ValueType,
    pub default: Enablement,
    pub dependencies: &'static [&'static str],
}

/// An entity's declaration plus its enablement resolved from the
/// environment (and possibly overridden by cascade-disable).
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    pub declaration: EntityDeclaration,
    pub enablement: Enablement,
}

impl ResolvedEntity {
    pub fn is_enabled(&self) -> bool {
        self.enablement.is_enabled()
    }
}

pub struct EntityRegistry {
    resolved: Vec<ResolvedEntity>,
}

impl EntityRegistry {
    /// Collects every entity's static declaration. Order here is the
    /// declaration order used as the topological sort's tie-break.
    fn declarations() -> Vec<EntityDeclaration> {
        vec![
            labels::declaration(),
            milestones::declaration(),
            issues::declaration(),
            comments::declaration(),
            sub_issues::declaration(),
            pull_requests::declaration(),
            pr_comments::declaration(),
            pr_reviews::declaration(),
            pr_review_comments::declaration(),
            releases::declaration(),
            git_repository::declaration(),
        ]
    }

    /// Builds the registry by reading each entity's environment variable,
    /// validating the declared dependency graph, and cascading disablement
    /// to fixpoint.
    pub fn discover() -> Result<Self, GithubDataError> {
        let declarations = Self::declarations();
        Self::validate_names_and_dependencies(&declarations)?;

        let mut resolved: Vec<ResolvedEntity> = declarations
            .into_iter()
            .map(|declaration| {
                let enablement = Self::read_enablement(&declaration)?;
                Ok(ResolvedEntity { declaration, enablement })
            })
            .collect::<Result<_, GithubDataError>>()?;

        Self::cascade_disable(&mut resolved);
        Self::verify_acyclic(&resolved)?;

        Ok(EntityRegistry { resolved })
    }

    fn read_enablement(declaration: &EntityDeclaration) -> Result<Enablement, GithubDataError> {
        match std::env::var(declaration.env_var) {
            Err(_) => Ok(declaration.default.clone()),
            Ok(raw) => match declaration.value_type {
                ValueType::Bool => number_spec::parse_boolean(&raw)
                    .map(Enablement::Bool)
                    .map_err(|e| invalid_enablement(declaration.name, &e.to_string())),
                ValueType::SelectionSet => number_spec::parse_enablement(&raw)
                    .map_err(|e| invalid_enablement(declaration.name, &e.to_string())),
            },
        }
    }

    fn validate_names_and_dependencies(declarations: &[EntityDeclaration]) -> Result<(), GithubDataError> {
        let names: HashSet<&str> = declarations.iter().map(|d| d.name).collect();
        if names.len() != declarations.len() {
            return Err(GithubDataError::Config("duplicate entity name declared".to_string()));
        }
        for declaration in declarations {
            for dep in declaration.dependencies {
                if !names.contains(dep) {
                    return Err(GithubDataError::Config(format!(
                        "entity '{}' depends on unknown entity '{dep}'",
                        declaration.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Disables any entity whose any dependency is disabled, repeating until
    /// no further entity changes state (spec §3 invariant: cascade).
    fn cascade_disable(resolved: &mut [ResolvedEntity]) {
        loop {
            let disabled: HashSet<&str> = resolved
                .iter()
                .filter(|e| !e.is_enabled())
                .map(|e| e.declaration.name)
                .collect();

            let mut changed = false;
            for entity in resolved.iter_mut() {
                if entity.is_enabled()
                    && entity.declaration.dependencies.iter().any(|d| disabled.contains(d))
                {
                    entity.enablement = Enablement::Bool(false);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    fn verify_acyclic(resolved: &[ResolvedEntity]) -> Result<(), GithubDataError> {
        Self::topo_sort_names(resolved).map(|_| ())
    }

    /// Stable topological sort (Kahn's algorithm), ties broken by
    /// declaration order (spec §4.3).
    fn topo_sort_names(resolved: &[ResolvedEntity]) -> Result<Vec<&str>, GithubDataError> {
        let order: HashMap<&str, usize> = resolved
            .iter()
            .enumerate()
            .map(|(i, e)| (e.declaration.name, i))
            .collect();

        let mut in_degree: HashMap<&str, usize> = resolved
            .iter()
            .map(|e| (e.declaration.name, e.declaration.dependencies.len()))
            .collect();

        let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
        for entity in resolved {
            for dep in entity.declaration.dependencies {
                dependents.entry(dep).or_default().push(entity.declaration.name);
            }
        }

        let mut ready: Vec<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        ready.sort_by_key(|name| order[name]);

        let mut sorted = Vec::with_capacity(resolved.len());
        while let Some(name) = ready.first().copied() {
            ready.remove(0);
            sorted.push(name);
            if let Some(children) = dependents.get(name) {
                let mut newly_ready = Vec::new();
                for child in children {
                    let degree = in_degree.get_mut(child).unwrap();
                    *degree -= 1;
                    if *degree == 0 {
                        newly_ready.push(*child);
                    }
                }
                ready.extend(newly_ready);
                ready.sort_by_key(|name| order[name]);
            }
        }

        if sorted.len() != resolved.len() {
            return Err(GithubDataError::Config(
                "dependency cycle detected among entity declarations".to_string(),
            ));
        }
        Ok(sorted)
    }

    /// The enabled entities in dependency order (spec §4.5 step 1).
    pub fn get_enabled_entities(&self) -> Vec<&ResolvedEntity> {
        let order = Self::topo_sort_names(&self.resolved).expect("validated acyclic at construction");
        order
            .into_iter()
            .filter_map(|name| self.resolved.iter().find(|e| e.declaration.name == name))
            .filter(|e| e.is_enabled())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&ResolvedEntity> {
        self.resolved.iter().find(|e| e.declaration.name == name)
    }
}

fn invalid_enablement(entity_name: &str, detail: &str) -> GithubDataError {
    GithubDataError::Config(format!("invalid enablement for '{entity_name}': {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_have_unique_names_and_known_dependencies() {
        let declarations = EntityRegistry::declarations();
        EntityRegistry::validate_names_and_dependencies(&declarations).unwrap();
    }

    #[test]
    fn declared_graph_is_acyclic() {
        let declarations = EntityRegistry::declarations();
        let resolved: Vec<ResolvedEntity> = declarations
            .into_iter()
            .map(|declaration| ResolvedEntity {
                enablement: declaration.default.clone(),
                declaration,
            })
            .collect();
        assert!(EntityRegistry::verify_acyclic(&resolved).is_ok());
    }

    #[test]
    fn cascade_disable_propagates_transitively() {
        let declarations = EntityRegistry::declarations();
        let mut resolved: Vec<ResolvedEntity> = declarations
            .into_iter()
            .map(|declaration| ResolvedEntity {
                enablement: Enablement::Bool(true),
                declaration,
            })
            .collect();
        for entity in resolved.iter_mut() {
            if entity.declaration.name == "milestones" {
                entity.enablement = Enablement::Bool(false);
            }
        }
        EntityRegistry::cascade_disable(&mut resolved);

        let issues = resolved.iter().find(|e| e.declaration.name == "issues").unwrap();
        assert!(!issues.is_enabled());
        let comments = resolved.iter().find(|e| e.declaration.name == "comments").unwrap();
        assert!(!comments.is_enabled());
        let labels = resolved.iter().find(|e| e.declaration.name == "labels").unwrap();
        assert!(labels.is_enabled());
    }
}
