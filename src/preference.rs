//! Preference graph over rule names (C3).
//!
//! A directed graph where an edge `higher -> lower` means `higher` is more
//! preferred than `lower`. Nodes are rule-name strings inserted and removed
//! by value, and the only traversal this module needs is reachability, so
//! it is a plain adjacency map rather than an indexed-node graph library —
//! see `DESIGN.md` for why `petgraph` was dropped.

use std::collections::{HashMap, HashSet};

use crate::error::ArgueError;
use crate::term::OrderingRule;

/// Directed acyclic graph over rule names, with cycle-rejecting insertion.
#[derive(Debug, Clone, Default)]
pub struct PreferenceGraph {
    edges: HashMap<String, HashSet<String>>,
}

impl PreferenceGraph {
    pub fn new() -> Self {
        PreferenceGraph {
            edges: HashMap::new(),
        }
    }

    fn add_node(&mut self, node: &str) {
        self.edges.entry(node.to_string()).or_default();
    }

    fn has_path(&self, start: &str, end: &str) -> bool {
        if start == end {
            return true;
        }
        let mut visited = HashSet::new();
        let mut stack = vec![start.to_string()];
        while let Some(node) = stack.pop() {
            if !visited.insert(node.clone()) {
                continue;
            }
            if let Some(succs) = self.edges.get(&node) {
                for s in succs {
                    if s == end {
                        return true;
                    }
                    stack.push(s.clone());
                }
            }
        }
        false
    }

    /// Insert every `(higher, lower)` pair implied by `ordering`, expanding
    /// chained groups (`A < B < C`). Tentatively applies every pair to a
    /// clone first; if any pair would create a cycle (a path already exists
    /// from `lower` back to `higher`), the whole ordering is rejected and
    /// nothing is committed.
    pub fn insert_ordering(&mut self, ordering: &OrderingRule) -> Result<(), ArgueError> {
        let mut candidate = self.clone();
        for (higher, lower) in ordering.pairs() {
            candidate.add_node(&higher);
            candidate.add_node(&lower);
            if candidate.has_path(&lower, &higher) {
                return Err(ArgueError::KbError {
                    message: format!(
                        "preference ordering would create a cycle: {lower} is already more preferred than {higher}"
                    ),
                });
            }
            candidate.edges.get_mut(&higher).unwrap().insert(lower);
        }
        *self = candidate;
        Ok(())
    }

    /// Remove exactly the pairs `insert_ordering(ordering)` would have
    /// produced. Missing edges are silently ignored.
    pub fn delete_ordering(&mut self, ordering: &OrderingRule) {
        for (higher, lower) in ordering.pairs() {
            if let Some(succs) = self.edges.get_mut(&higher) {
                succs.remove(&lower);
            }
        }
    }

    /// True iff there is a directed path of length >= 1 from `a` to `b`.
    /// Equal names always return false.
    pub fn more_preferred(&self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        match self.edges.get(a) {
            Some(succs) => {
                let mut visited = HashSet::new();
                let mut stack: Vec<String> = succs.iter().cloned().collect();
                while let Some(node) = stack.pop() {
                    if node == b {
                        return true;
                    }
                    if !visited.insert(node.clone()) {
                        continue;
                    }
                    if let Some(next) = self.edges.get(&node) {
                        stack.extend(next.iter().cloned());
                    }
                }
                false
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edges.values().all(|s| s.is_empty())
    }

    /// Iterate `(higher, lowers)` pairs for every node with at least one
    /// outgoing edge — used by the knowledge base to serialize the ordering
    /// back into rule-file text (`lowers < higher` per §6).
    pub fn edges(&self) -> impl Iterator<Item = (&String, &HashSet<String>)> {
        self.edges.iter().filter(|(_, lowers)| !lowers.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordering(chain: &[&[&str]]) -> OrderingRule {
        OrderingRule {
            groups: chain
                .iter()
                .map(|g| g.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn simple_insertion_is_reflected_in_more_preferred() {
        let mut g = PreferenceGraph::new();
        g.insert_ordering(&ordering(&[&["R1"], &["R2"]])).unwrap();
        assert!(g.more_preferred("R2", "R1"));
        assert!(!g.more_preferred("R1", "R2"));
    }

    #[test]
    fn equal_names_are_never_more_preferred() {
        let g = PreferenceGraph::new();
        assert!(!g.more_preferred("R1", "R1"));
    }

    #[test]
    fn chained_ordering_expands_transitively() {
        let mut g = PreferenceGraph::new();
        g.insert_ordering(&ordering(&[&["R1"], &["R2"], &["R3"]]))
            .unwrap();
        assert!(g.more_preferred("R3", "R1"));
        assert!(g.more_preferred("R3", "R2"));
        assert!(g.more_preferred("R2", "R1"));
    }

    #[test]
    fn reverse_insertion_after_forward_fails_with_cycle() {
        let mut g = PreferenceGraph::new();
        g.insert_ordering(&ordering(&[&["R1"], &["R2"]])).unwrap();
        let err = g.insert_ordering(&ordering(&[&["R2"], &["R1"]])).unwrap_err();
        assert!(matches!(err, ArgueError::KbError { .. }));
        // DAG left unchanged: original direction still holds.
        assert!(g.more_preferred("R2", "R1"));
        assert!(!g.more_preferred("R1", "R2"));
    }

    #[test]
    fn failed_insertion_leaves_graph_unchanged() {
        let mut g = PreferenceGraph::new();
        g.insert_ordering(&ordering(&[&["R1"], &["R2"]])).unwrap();
        let before = g.edges.clone();
        let _ = g.insert_ordering(&ordering(&[&["R2"], &["R1"]]));
        assert_eq!(g.edges, before);
    }

    #[test]
    fn delete_ordering_removes_exactly_inserted_pairs() {
        let mut g = PreferenceGraph::new();
        g.insert_ordering(&ordering(&[&["R1"], &["R2", "R3"]]))
            .unwrap();
        g.delete_ordering(&ordering(&[&["R1"], &["R2", "R3"]]));
        assert!(!g.more_preferred("R2", "R1"));
        assert!(!g.more_preferred("R3", "R1"));
    }

    #[test]
    fn delete_of_missing_edge_is_a_no_op() {
        let mut g = PreferenceGraph::new();
        g.delete_ordering(&ordering(&[&["R1"], &["R2"]]));
        assert!(g.is_empty());
    }
}
