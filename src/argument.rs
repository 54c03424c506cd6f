//! Argument graph (C6): wraps each proof as an argument and derives the
//! undercut/rebut attack edges between them.
//!
//! Arguments attack each other cyclically (mutual rebut is the common
//! case), which an owned tree of arguments cannot represent without
//! reference cycles. Per the "cyclic structures" design note, arguments are
//! addressed by a stable [`ArgumentId`] — an index into a dense array owned
//! by the graph — and edges are plain id pairs in `plus`/`minus` sets. A
//! rebuild clears those sets and recomputes them; it never reallocates the
//! argument array itself, since arguments mirror the KB's proofs one to
//! one.

use std::collections::HashSet;

use crate::kb::KnowledgeBase;
use crate::proof::{Proof, ProofId, RuleId};
use crate::term::Literal;

/// Stable index into the dense argument array owned by an
/// [`ArgumentGraph`]. Mirrors the [`ProofId`] of the proof it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgumentId(pub usize);

/// A single proof considered as a node of the attack graph.
#[derive(Debug, Clone)]
pub struct Argument {
    pub id: ArgumentId,
    pub proof: ProofId,
    pub consequent: Literal,
    pub is_strict: bool,
    pub weakest_link: RuleId,
    /// Arguments this one attacks.
    pub plus: HashSet<ArgumentId>,
    /// Arguments that attack this one.
    pub minus: HashSet<ArgumentId>,
}

/// Wraps a knowledge base's proof set as one argument per proof and derives
/// the undercut/rebut edges between them.
#[derive(Debug, Clone, Default)]
pub struct ArgumentGraph {
    arguments: Vec<Argument>,
}

impl ArgumentGraph {
    pub fn new() -> Self {
        ArgumentGraph {
            arguments: Vec::new(),
        }
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn argument(&self, id: ArgumentId) -> Option<&Argument> {
        self.arguments.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Rebuild the argument set and attack edges from `kb`'s current proof
    /// arena and preferences. Idempotent: calling twice with no KB change
    /// between calls produces identical edge sets.
    pub fn rebuild(&mut self, kb: &KnowledgeBase) {
        let arena: Vec<&Proof> = kb.proofs().collect();

        self.arguments = arena
            .iter()
            .map(|p| Argument {
                id: ArgumentId(p.id.0),
                proof: p.id,
                consequent: p.consequent.clone(),
                is_strict: p.is_strict,
                weakest_link: p.weakest_link,
                plus: HashSet::new(),
                minus: HashSet::new(),
            })
            .collect();

        let proofs: Vec<Proof> = arena.into_iter().cloned().collect();
        let weakest_rule_name =
            |rule: RuleId| kb.rule(rule).map(|r| r.display_name()).unwrap_or_default();

        for a2_idx in 0..self.arguments.len() {
            if self.arguments[a2_idx].is_strict {
                continue;
            }
            let a2_proof = &proofs[a2_idx];
            let a2_closure = a2_proof.closure(&proofs);

            for a1_idx in 0..self.arguments.len() {
                if a1_idx == a2_idx {
                    continue;
                }
                let a1_conclusion_neg = self.arguments[a1_idx].consequent.negate();

                let mut attacked = false;
                for &pid in &a2_closure {
                    let p = &proofs[pid.0];
                    if p.vulnerabilities.contains(&a1_conclusion_neg) {
                        attacked = true;
                        break;
                    }
                }

                if !attacked {
                    for &pid in &a2_closure {
                        let p = &proofs[pid.0];
                        if p.consequent != a1_conclusion_neg {
                            continue;
                        }
                        let a1_weakest = self.arguments[a1_idx].weakest_link;
                        let p_weakest = p.weakest_link;
                        let rebutter_weaker =
                            kb.more_preferred(&weakest_rule_name(p_weakest), &weakest_rule_name(a1_weakest));
                        if !rebutter_weaker {
                            attacked = true;
                            break;
                        }
                    }
                }

                if attacked {
                    self.arguments[a1_idx].plus.insert(ArgumentId(a2_idx));
                    self.arguments[a2_idx].minus.insert(ArgumentId(a1_idx));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{DefeasibleRule, Literal, Rule, StrictRule};

    fn strict(ante: Vec<&str>, cons: &str) -> Rule {
        Rule::Strict(StrictRule::new(
            None,
            ante.into_iter().map(Literal::positive).collect(),
            Literal::positive(cons),
        ))
    }

    #[test]
    fn scenario_1_undercut() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(strict(vec![], "a")).unwrap();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("b"),
            vec![Literal::positive("a").negate()],
        )))
        .unwrap();

        let mut graph = ArgumentGraph::new();
        graph.rebuild(&kb);
        assert_eq!(graph.len(), 2);

        let a_arg = graph
            .arguments()
            .iter()
            .find(|a| a.consequent == Literal::positive("a"))
            .unwrap();
        let b_arg = graph
            .arguments()
            .iter()
            .find(|a| a.consequent == Literal::positive("b"))
            .unwrap();
        assert!(a_arg.plus.contains(&b_arg.id));
        assert!(b_arg.minus.contains(&a_arg.id));
    }

    #[test]
    fn scenario_2_preference_breaks_mutual_rebut() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            Some("R1".into()),
            vec![],
            Literal::positive("b").negate(),
            vec![],
        )))
        .unwrap();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            Some("R2".into()),
            vec![],
            Literal::positive("b"),
            vec![],
        )))
        .unwrap();
        kb.add_ordering(crate::term::OrderingRule {
            groups: vec![vec!["R1".into()], vec!["R2".into()]],
        })
        .unwrap();

        let mut graph = ArgumentGraph::new();
        graph.rebuild(&kb);

        let b_arg = graph
            .arguments()
            .iter()
            .find(|a| a.consequent == Literal::positive("b"))
            .unwrap();
        let not_b_arg = graph
            .arguments()
            .iter()
            .find(|a| a.consequent == Literal::positive("b").negate())
            .unwrap();
        assert!(b_arg.plus.contains(&not_b_arg.id));
        assert!(!not_b_arg.plus.contains(&b_arg.id));
    }

    #[test]
    fn scenario_3_no_ordering_is_mutual_rebut() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("a"),
            vec![],
        )))
        .unwrap();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("a").negate(),
            vec![],
        )))
        .unwrap();

        let mut graph = ArgumentGraph::new();
        graph.rebuild(&kb);
        let a = &graph.arguments()[0];
        let not_a = &graph.arguments()[1];
        assert!(a.plus.contains(&not_a.id));
        assert!(not_a.plus.contains(&a.id));
    }

    #[test]
    fn strict_arguments_are_never_attacked() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(strict(vec![], "a")).unwrap();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("a").negate(),
            vec![],
        )))
        .unwrap();

        let mut graph = ArgumentGraph::new();
        graph.rebuild(&kb);
        let a_arg = graph
            .arguments()
            .iter()
            .find(|a| a.consequent == Literal::positive("a"))
            .unwrap();
        assert!(a_arg.minus.is_empty());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("a"),
            vec![],
        )))
        .unwrap();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            None,
            vec![],
            Literal::positive("a").negate(),
            vec![],
        )))
        .unwrap();

        let mut graph = ArgumentGraph::new();
        graph.rebuild(&kb);
        let first: Vec<(usize, usize)> = graph
            .arguments()
            .iter()
            .map(|a| (a.plus.len(), a.minus.len()))
            .collect();
        graph.rebuild(&kb);
        let second: Vec<(usize, usize)> = graph
            .arguments()
            .iter()
            .map(|a| (a.plus.len(), a.minus.len()))
            .collect();
        assert_eq!(first, second);
    }
}
