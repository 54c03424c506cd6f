//! Forward-chaining proof constructor (C4) and proof value type.
//!
//! A [`Proof`] is a tree of rule applications grounding a consequent,
//! represented with stable indices rather than owned sub-proof values: a
//! proof's antecedents are [`ProofId`]s into the knowledge base's proof
//! arena, and its rule is a [`RuleId`] assigned by the knowledge base at
//! rule-insertion time. This sidesteps the ownership cycles that a
//! directly-nested tree would run into once arguments (built from proofs)
//! start attacking each other.
//!
//! Per the Non-goal on incremental labelling repair, a knowledge base edit
//! invalidates the whole proof set; [`construct_all_proofs`] always rebuilds
//! the complete fixed point from the full working-memory rule set rather
//! than incrementally extending a prior arena. This is simpler than — and
//! produces the same fixed point as — folding new rules into an existing
//! proof index, while still satisfying termination and loop-prevention.

use std::collections::{HashMap, HashSet};

use crate::preference::PreferenceGraph;
use crate::term::{Literal, Rule, StrictRule};

/// Stable identifier for a rule in the knowledge base's working memory.
/// Assigned once at insertion and never reused, even after the owning rule
/// is deleted, so a [`Proof`] can reference its rule safely across rebuilds
/// that happened before the deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

/// Stable index into the proof arena produced by one [`construct_all_proofs`]
/// call. Proof arenas are replaced wholesale on every knowledge base edit,
/// so a `ProofId` is only valid against the arena it was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProofId(pub usize);

/// A tree of rule applications grounding `consequent`, referencing its
/// sub-proofs by [`ProofId`].
#[derive(Debug, Clone)]
pub struct Proof {
    pub id: ProofId,
    /// `P<N>` display name, assigned in creation order.
    pub name: String,
    pub rule: RuleId,
    /// One sub-proof per antecedent literal of `rule`; empty for axioms.
    pub sub_proofs: HashMap<Literal, ProofId>,
    pub consequent: Literal,
    pub is_strict: bool,
    /// Vulnerabilities of the top rule only (empty for strict proofs).
    pub vulnerabilities: Vec<Literal>,
    pub weakest_link: RuleId,
}

impl Proof {
    /// All proof ids in this proof's closure: itself plus every transitive
    /// sub-proof.
    pub fn closure(&self, arena: &[Proof]) -> HashSet<ProofId> {
        let mut out = HashSet::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            if !out.insert(id) {
                continue;
            }
            if let Some(p) = arena.get(id.0) {
                stack.extend(p.sub_proofs.values().copied());
            }
        }
        out
    }

    /// Every rule id appearing anywhere in this proof's closure.
    pub fn rules_in_closure(&self, arena: &[Proof]) -> Vec<RuleId> {
        self.closure(arena)
            .into_iter()
            .filter_map(|id| arena.get(id.0).map(|p| p.rule))
            .collect()
    }

    /// True if `rule` appears anywhere in this proof's closure — used by
    /// the forward-chaining constructor to reject candidates that would
    /// loop a rule back through one of its own antecedents.
    pub fn uses_rule(&self, rule: RuleId, arena: &[Proof]) -> bool {
        self.closure(arena)
            .into_iter()
            .filter_map(|id| arena.get(id.0))
            .any(|p| p.rule == rule)
    }

    pub fn antecedents(&self) -> Vec<&Literal> {
        self.sub_proofs.keys().collect()
    }
}

/// Generate the `n` contrapositions of a strict rule with `n` antecedents:
/// `a1,…,an → c` yields, for each `i`, `a1,…,a(i-1),−c,a(i+1),…,an → −ai`.
/// Contrapositions inherit a derived name `<rule>-<i>` when the source rule
/// was named.
pub fn contrapositions(rule: &StrictRule) -> Vec<StrictRule> {
    let mut out = Vec::with_capacity(rule.antecedent.len());
    for (i, ai) in rule.antecedent.iter().enumerate() {
        let mut antecedent: Vec<Literal> = rule
            .antecedent
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, lit)| lit.clone())
            .collect();
        antecedent.push(rule.consequent.negate());
        let name = rule.name.as_ref().map(|n| format!("{n}-{i}"));
        out.push(StrictRule::new(name, antecedent, ai.negate()));
    }
    out
}

/// Compute the weakest link of a freshly constructed proof: a strict
/// proof's weakest link is its own top rule; a defeasible proof's weakest
/// link is the least-preferred rule anywhere in its closure, where ties
/// (undefined preference between the running candidate and the next rule)
/// keep the previous candidate.
fn compute_weakest_link(
    top_rule: RuleId,
    is_strict: bool,
    sub_proof_ids: &[ProofId],
    arena: &[Proof],
    rules: &HashMap<RuleId, &Rule>,
    prefs: &PreferenceGraph,
) -> RuleId {
    if is_strict {
        return top_rule;
    }
    let mut weakest = top_rule;
    let rule_name = |id: RuleId| rules[&id].display_name();

    let mut closure_rules = vec![top_rule];
    for sub_id in sub_proof_ids {
        if let Some(p) = arena.get(sub_id.0) {
            closure_rules.extend(p.rules_in_closure(arena));
        }
    }

    for candidate in closure_rules {
        if candidate == weakest {
            continue;
        }
        let candidate_is_strict = rules[&candidate].is_strict();
        let weakest_is_strict = rules[&weakest].is_strict();
        if weakest_is_strict && !candidate_is_strict {
            weakest = candidate;
        } else if prefs.more_preferred(&rule_name(weakest), &rule_name(candidate)) {
            weakest = candidate;
        }
        // else: candidate not known weaker, or preference undefined —
        // keep the previous candidate.
    }
    weakest
}

/// Build the complete forward-chaining fixed point over `rules` (every
/// active working-memory rule, contrapositions included, paired with its
/// stable [`RuleId`]), returning the new proof arena and an index from
/// consequent literal to the proof ids that derive it.
pub fn construct_all_proofs(
    rules: &[(RuleId, Rule)],
    prefs: &PreferenceGraph,
) -> (Vec<Proof>, HashMap<Literal, Vec<ProofId>>) {
    let rule_map: HashMap<RuleId, &Rule> = rules.iter().map(|(id, r)| (*id, r)).collect();

    let mut arena: Vec<Proof> = Vec::new();
    let mut index: HashMap<Literal, Vec<ProofId>> = HashMap::new();
    let mut seen_combos: HashSet<(RuleId, Vec<ProofId>)> = HashSet::new();
    let mut next_name = 0usize;

    let mut order: Vec<RuleId> = rules.iter().map(|(id, _)| *id).collect();
    order.sort_by(|a, b| rule_map[a].cmp(rule_map[b]));

    loop {
        let mut added_this_pass = false;

        for &rid in &order {
            let rule = rule_map[&rid];
            let antecedent = rule.antecedent();

            if antecedent.is_empty() {
                let combo_key: Vec<ProofId> = Vec::new();
                if seen_combos.contains(&(rid, combo_key.clone())) {
                    continue;
                }
                let id = push_proof(&mut arena, rid, rule, HashMap::new(), &rule_map, prefs, &mut next_name);
                index.entry(rule.consequent().clone()).or_default().push(id);
                seen_combos.insert((rid, combo_key));
                added_this_pass = true;
                continue;
            }

            let per_antecedent: Option<Vec<&Vec<ProofId>>> =
                antecedent.iter().map(|lit| index.get(lit)).collect();
            let Some(choice_sets) = per_antecedent else {
                continue;
            };
            if choice_sets.iter().any(|c| c.is_empty()) {
                continue;
            }

            for combo in cartesian_product(&choice_sets) {
                if seen_combos.contains(&(rid, combo.clone())) {
                    continue;
                }
                seen_combos.insert((rid, combo.clone()));

                if combo
                    .iter()
                    .any(|sub_id| arena[sub_id.0].uses_rule(rid, &arena))
                {
                    continue;
                }

                let mut sub_proofs = HashMap::new();
                for (lit, sub_id) in antecedent.iter().zip(combo.iter()) {
                    sub_proofs.insert((*lit).clone(), *sub_id);
                }
                let id = push_proof(&mut arena, rid, rule, sub_proofs, &rule_map, prefs, &mut next_name);
                index.entry(rule.consequent().clone()).or_default().push(id);
                added_this_pass = true;
            }
        }

        if !added_this_pass {
            break;
        }
    }

    (arena, index)
}

fn push_proof(
    arena: &mut Vec<Proof>,
    rid: RuleId,
    rule: &Rule,
    sub_proofs: HashMap<Literal, ProofId>,
    rules: &HashMap<RuleId, &Rule>,
    prefs: &PreferenceGraph,
    next_name: &mut usize,
) -> ProofId {
    let id = ProofId(arena.len());
    let sub_ids: Vec<ProofId> = sub_proofs.values().copied().collect();
    let is_strict = rule.is_strict() && sub_ids.iter().all(|sid| arena[sid.0].is_strict);
    let weakest_link = compute_weakest_link(rid, is_strict, &sub_ids, arena, rules, prefs);
    let name = format!("P{}", *next_name);
    *next_name += 1;
    arena.push(Proof {
        id,
        name,
        rule: rid,
        sub_proofs,
        consequent: rule.consequent().clone(),
        is_strict,
        vulnerabilities: rule.vulnerabilities().to_vec(),
        weakest_link,
    });
    id
}

fn cartesian_product(sets: &[&Vec<ProofId>]) -> Vec<Vec<ProofId>> {
    let mut out: Vec<Vec<ProofId>> = vec![Vec::new()];
    for set in sets {
        let mut next = Vec::with_capacity(out.len() * set.len());
        for prefix in &out {
            for item in set.iter() {
                let mut combo = prefix.clone();
                combo.push(*item);
                next.push(combo);
            }
        }
        out = next;
    }
    out
}
