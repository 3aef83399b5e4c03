//! Bidirectional adjacency built from stored relation facts.

use std::collections::HashMap;

use super::{Gender, PersonId, RelationFact, RelationType};

/// Outgoing edge: `to` is this node's `relation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: PersonId,
    pub relation: RelationType,
}

/// In-memory family graph, rebuilt for every resolution pass.
#[derive(Debug, Default)]
pub struct FamilyGraph {
    adjacency: HashMap<PersonId, Vec<Edge>>,
    genders: HashMap<PersonId, Gender>,
}

impl FamilyGraph {
    /// Build the graph from the directory and the flat fact list.
    ///
    /// Every person becomes a node. Each fact adds its forward edge and the
    /// derived reverse edge, in fact order, which fixes the BFS tie-break.
    pub fn build<I>(people: I, facts: &[RelationFact]) -> Self
    where
        I: IntoIterator<Item = (PersonId, Gender)>,
    {
        let mut graph = FamilyGraph::default();

        for (id, gender) in people {
            graph.genders.insert(id, gender);
            graph.adjacency.entry(id).or_default();
        }

        for fact in facts {
            let source_gender = graph.gender(fact.source);
            graph.adjacency.entry(fact.source).or_default().push(Edge {
                to: fact.target,
                relation: fact.relation,
            });
            graph.adjacency.entry(fact.target).or_default().push(Edge {
                to: fact.source,
                relation: fact.relation.reverse(source_gender),
            });
        }

        log::debug!(
            "Built family graph: {} nodes, {} edges from {} facts",
            graph.node_count(),
            graph.edge_count(),
            facts.len()
        );

        graph
    }

    pub fn neighbors(&self, id: PersonId) -> &[Edge] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.adjacency.contains_key(&id)
    }

    /// Gender of a known person; `Unknown` for anyone not in the directory.
    pub fn gender(&self, id: PersonId) -> Gender {
        self.genders.get(&id).copied().unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }
}
