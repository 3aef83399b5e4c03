//! BFS shortest relation path over the family graph.

use std::collections::{HashSet, VecDeque};

use super::{FamilyGraph, PersonId, RelationType};

/// Find the shortest relation path from `start` to `end`.
///
/// Returns the relation labels along the path, `Some(vec![])` when
/// `start == end`, or `None` when `end` is unknown or further than
/// `max_depth` hops away. Ties between equal-length paths go to the one
/// reached first in edge insertion order.
pub fn find_path(
    graph: &FamilyGraph,
    start: PersonId,
    end: PersonId,
    max_depth: usize,
) -> Option<Vec<RelationType>> {
    if !graph.contains(start) || !graph.contains(end) {
        return None;
    }

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    queue.push_back((start, Vec::new()));
    visited.insert(start);

    while let Some((node, path)) = queue.pop_front() {
        if node == end {
            return Some(path);
        }

        if path.len() >= max_depth {
            continue;
        }

        for edge in graph.neighbors(node) {
            if visited.insert(edge.to) {
                let mut next = path.clone();
                next.push(edge.relation);
                queue.push_back((edge.to, next));
            }
        }
    }

    None
}
