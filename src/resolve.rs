//! Override reconciliation: stored custom terms first, computed terms second.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{find_path, FamilyGraph, Gender, PersonId, RelationFact};
use crate::terms::{resolve_term, Locale, Term};

/// The outcome of naming one person for one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolvedTerm {
    /// The viewer looking at themselves
    Me,
    /// A custom term the viewer stored for this person
    Override(String),
    /// A term derived from the relation path
    Computed(Term),
    /// No override and no nameable path
    Unset,
}

impl ResolvedTerm {
    pub fn render(&self, locale: Locale) -> String {
        match self {
            ResolvedTerm::Me => locale.me().to_string(),
            ResolvedTerm::Override(term) => term.clone(),
            ResolvedTerm::Computed(term) => term.label(locale).to_string(),
            ResolvedTerm::Unset => locale.unset().to_string(),
        }
    }
}

/// Resolves terms for a single viewer over one freshly built graph.
pub struct Resolver<'a> {
    graph: FamilyGraph,
    viewer: PersonId,
    overrides: &'a HashMap<PersonId, String>,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    /// `overrides` maps target id to the viewer's custom term.
    pub fn new(
        viewer: PersonId,
        people: &[(PersonId, Gender)],
        facts: &[RelationFact],
        overrides: &'a HashMap<PersonId, String>,
        max_depth: usize,
    ) -> Self {
        Self {
            graph: FamilyGraph::build(people.iter().copied(), facts),
            viewer,
            overrides,
            max_depth,
        }
    }

    pub fn resolve(&self, target: PersonId) -> ResolvedTerm {
        if target == self.viewer {
            return ResolvedTerm::Me;
        }

        if let Some(custom) = self.overrides.get(&target) {
            if !custom.trim().is_empty() {
                return ResolvedTerm::Override(custom.clone());
            }
        }

        find_path(&self.graph, self.viewer, target, self.max_depth)
            .and_then(|path| {
                resolve_term(&path, self.graph.gender(self.viewer), self.graph.gender(target))
            })
            .map(ResolvedTerm::Computed)
            .unwrap_or(ResolvedTerm::Unset)
    }
}

/// Resolve every person in `people`, in order, for `viewer`.
pub fn resolve_all(
    viewer: PersonId,
    people: &[(PersonId, Gender)],
    facts: &[RelationFact],
    overrides: &HashMap<PersonId, String>,
    max_depth: usize,
) -> Vec<(PersonId, ResolvedTerm)> {
    let resolver = Resolver::new(viewer, people, facts, overrides, max_depth);
    people
        .iter()
        .map(|&(id, _)| (id, resolver.resolve(id)))
        .collect()
}
