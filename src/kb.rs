//! Knowledge base (C5): owns rules, the preference graph, and the derived
//! proof set; mediates every edit and publishes change notifications.
//!
//! Every mutating operation rebuilds the proof set from scratch (see the
//! module docs on `proof::construct_all_proofs`): a rule or ordering edit
//! either commits cleanly or is rejected and the prior state is left
//! untouched, so invariants I1–I6 hold across every public call, including
//! failed ones.

use std::collections::{HashMap, HashSet};

use crate::error::{ArgueError, ArgueResult};
use crate::observer::{Event, ObserverId, ObserverRegistry};
use crate::parser::{self, ParsedItem};
use crate::preference::PreferenceGraph;
use crate::proof::{self, Proof, ProofId, RuleId};
use crate::term::{Literal, OrderingRule, Rule};

/// Owns user-declared rules, their derived contrapositions, the preference
/// graph, and the proof set that is their forward-chaining fixed point.
pub struct KnowledgeBase {
    rules: HashMap<RuleId, Rule>,
    next_rule_id: usize,
    /// Rules the user declared directly (I1) — what `load_file`/`save`
    /// round-trips; excludes derived contrapositions.
    user_rule_ids: HashSet<RuleId>,
    /// Contraposition ids derived from a strict user rule, keyed by that
    /// rule's id, so deleting it also removes its contrapositions.
    contraposition_ids: HashMap<RuleId, Vec<RuleId>>,
    preferences: PreferenceGraph,
    proofs: Vec<Proof>,
    proof_index: HashMap<Literal, Vec<ProofId>>,
    batch: bool,
    observers: ObserverRegistry,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        KnowledgeBase {
            rules: HashMap::new(),
            next_rule_id: 0,
            user_rule_ids: HashSet::new(),
            contraposition_ids: HashMap::new(),
            preferences: PreferenceGraph::new(),
            proofs: Vec::new(),
            proof_index: HashMap::new(),
            batch: false,
            observers: ObserverRegistry::new(),
        }
    }

    /// Suppress proof reconstruction on every mutation while `true`; the
    /// caller must call [`recalculate`](Self::recalculate) afterward.
    pub fn set_batch(&mut self, batch: bool) {
        self.batch = batch;
    }

    pub fn is_batch(&self) -> bool {
        self.batch
    }

    pub fn subscribe(&mut self, callback: Box<dyn FnMut(&Event)>) -> ObserverId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) {
        self.observers.unsubscribe(id);
    }

    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    pub fn is_user_rule(&self, id: RuleId) -> bool {
        self.user_rule_ids.contains(&id)
    }

    pub fn user_rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        self.user_rule_ids
            .iter()
            .filter_map(|id| self.rules.get(id).map(|r| (*id, r)))
    }

    pub fn proofs(&self) -> impl Iterator<Item = &Proof> {
        self.proofs.iter()
    }

    pub fn proof(&self, id: ProofId) -> Option<&Proof> {
        self.proofs.get(id.0)
    }

    pub fn proofs_for(&self, literal: &Literal) -> &[ProofId] {
        self.proof_index
            .get(literal)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn more_preferred(&self, a: &str, b: &str) -> bool {
        self.preferences.more_preferred(a, b)
    }

    /// Insert a rule into working memory. Strict rules also insert their
    /// contrapositions (see `proof::contrapositions`). Unless in batch mode,
    /// the proof set is rebuilt immediately; if the new proof set would
    /// contain two strict proofs with complementary consequents (I3), the
    /// insertion is rolled back and `KbError` is returned.
    pub fn add_rule(&mut self, rule: Rule) -> ArgueResult<RuleId> {
        let id = self.alloc_rule_id();
        let mut added_ids = vec![id];
        self.rules.insert(id, rule.clone());
        self.user_rule_ids.insert(id);

        if let Rule::Strict(strict) = &rule {
            let mut derived = Vec::new();
            for contra in proof::contrapositions(strict) {
                let cid = self.alloc_rule_id();
                self.rules.insert(cid, Rule::Strict(contra));
                derived.push(cid);
            }
            added_ids.extend(derived.iter().copied());
            self.contraposition_ids.insert(id, derived);
        }

        if !self.batch {
            if let Err(e) = self.recalculate() {
                for aid in &added_ids {
                    self.rules.remove(aid);
                }
                self.user_rule_ids.remove(&id);
                self.contraposition_ids.remove(&id);
                return Err(e);
            }
        }

        tracing::debug!(rule = %rule, id = id.0, "rule added");
        self.observers.emit(Event::RulesAdded(added_ids));
        Ok(id)
    }

    pub fn add_rule_str(&mut self, text: &str) -> ArgueResult<RuleId> {
        match parser::parse(text)? {
            ParsedItem::Rule(rule) => self.add_rule(rule),
            ParsedItem::Ordering(_) => Err(ArgueError::RuleError {
                message: "expected a rule, found an ordering".into(),
            }),
            ParsedItem::Literal(_) => Err(ArgueError::RuleError {
                message: "a bare literal is not a rule".into(),
            }),
        }
    }

    /// Delete a user-declared rule (and, for a strict rule, its
    /// contrapositions) from working memory.
    pub fn del_rule(&mut self, id: RuleId) -> ArgueResult<()> {
        if !self.user_rule_ids.remove(&id) {
            return Err(ArgueError::KbError {
                message: format!("rule {} is not a declared rule in this knowledge base", id.0),
            });
        }
        self.rules.remove(&id);
        let mut removed = vec![id];
        if let Some(derived) = self.contraposition_ids.remove(&id) {
            for cid in &derived {
                self.rules.remove(cid);
            }
            removed.extend(derived);
        }

        if !self.batch {
            self.recalculate()?;
        }

        tracing::debug!(id = id.0, "rule deleted");
        self.observers.emit(Event::RulesDeleted(removed));
        Ok(())
    }

    /// Expand and insert a preference ordering. Rejected (with the DAG left
    /// unchanged) if any implied edge would create a cycle.
    pub fn add_ordering(&mut self, ordering: OrderingRule) -> ArgueResult<()> {
        self.preferences.insert_ordering(&ordering)?;
        if !self.batch {
            self.recalculate()?;
        }
        tracing::debug!("preference ordering inserted");
        self.observers.emit(Event::OrderingChanged);
        Ok(())
    }

    pub fn del_ordering(&mut self, ordering: &OrderingRule) -> ArgueResult<()> {
        self.preferences.delete_ordering(ordering);
        if !self.batch {
            self.recalculate()?;
        }
        tracing::debug!("preference ordering removed");
        self.observers.emit(Event::OrderingChanged);
        Ok(())
    }

    /// Rebuild the proof set from scratch over every active working-memory
    /// rule. Rejects (leaving the prior proof set in place) if the new set
    /// would violate strict-proof consistency (I3).
    pub fn recalculate(&mut self) -> ArgueResult<()> {
        let active: Vec<(RuleId, Rule)> =
            self.rules.iter().map(|(id, r)| (*id, r.clone())).collect();
        let (arena, index) = proof::construct_all_proofs(&active, &self.preferences);
        check_strict_consistency(&arena)?;
        let added = arena.len() > self.proofs.len();
        self.proofs = arena;
        self.proof_index = index;
        tracing::debug!(proof_count = self.proofs.len(), "proof set rebuilt");
        self.observers.emit(Event::Updated { added });
        Ok(())
    }

    /// Parse and insert every rule/ordering line of `text` (the rule-file
    /// format from §6). Blank lines and comment-only lines are ignored.
    /// Per-line parse/semantic errors are collected and returned rather than
    /// halting the load; the proof set is rebuilt once at the end.
    pub fn load_file(&mut self, text: &str) -> ArgueResult<Vec<(usize, ArgueError)>> {
        let prior_batch = self.batch;
        self.batch = true;
        let mut errors = Vec::new();

        for (i, raw_line) in text.lines().enumerate() {
            let line_no = i + 1;
            let stripped = raw_line.split('#').next().unwrap_or("");
            if stripped.trim().is_empty() {
                continue;
            }
            if let Err(e) = self.load_line(raw_line, line_no) {
                tracing::warn!(line = line_no, error = %e, "line rejected while loading rule file");
                errors.push((line_no, e));
            }
        }

        self.batch = prior_batch;
        self.recalculate()?;
        Ok(errors)
    }

    fn load_line(&mut self, raw_line: &str, line_no: usize) -> ArgueResult<()> {
        match parser::parse_line(raw_line, Some(line_no))? {
            ParsedItem::Rule(rule) => {
                self.add_rule(rule)?;
            }
            ParsedItem::Ordering(o) => {
                self.add_ordering(o)?;
            }
            ParsedItem::Literal(_) => {
                return Err(ArgueError::RuleError {
                    message: "a bare literal is not a rule".into(),
                });
            }
        }
        Ok(())
    }

    /// Serialize the user-declared rules and preference edges back to
    /// rule-file text. Contrapositions and proof names are not persisted —
    /// they are regenerated by the next `recalculate()`.
    pub fn save_to_string(&self) -> String {
        let mut lines = Vec::new();
        let mut ids: Vec<RuleId> = self.user_rule_ids.iter().copied().collect();
        ids.sort_by_key(|id| id.0);
        for id in ids {
            if let Some(rule) = self.rules.get(&id) {
                lines.push(rule_line(rule));
            }
        }
        let mut edges: Vec<(&String, &HashSet<String>)> = self.preferences.edges().collect();
        edges.sort_by(|a, b| a.0.cmp(b.0));
        for (higher, lowers) in edges {
            let mut lowers: Vec<&String> = lowers.iter().collect();
            lowers.sort();
            let lowers_str = lowers
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("{lowers_str} < {higher}"));
        }
        lines.join("\n")
    }

    fn alloc_rule_id(&mut self) -> RuleId {
        let id = RuleId(self.next_rule_id);
        self.next_rule_id += 1;
        id
    }
}

fn rule_line(rule: &Rule) -> String {
    match rule.name() {
        Some(name) => format!("{name}: {rule}"),
        None => format!("{rule}"),
    }
}

fn check_strict_consistency(arena: &[Proof]) -> ArgueResult<()> {
    let mut strict_consequents: HashSet<&Literal> = HashSet::new();
    for p in arena.iter().filter(|p| p.is_strict) {
        strict_consequents.insert(&p.consequent);
    }
    for lit in &strict_consequents {
        if strict_consequents.contains(&lit.negate()) {
            return Err(ArgueError::KbError {
                message: format!(
                    "strict proofs exist for both {} and {}",
                    lit,
                    lit.negate()
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{DefeasibleRule, Literal, StrictRule};

    fn strict_rule(name: &str, ante: Vec<&str>, cons: Literal) -> Rule {
        Rule::Strict(StrictRule::new(
            Some(name.into()),
            ante.into_iter().map(Literal::positive).collect(),
            cons,
        ))
    }

    #[test]
    fn axiomatic_rule_yields_one_proof() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(strict_rule("S1", vec![], Literal::positive("p")))
            .unwrap();
        assert_eq!(kb.proofs().count(), 1);
    }

    #[test]
    fn mutual_strict_contradiction_is_rejected() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(strict_rule("S1", vec![], Literal::positive("p")))
            .unwrap();
        let err = kb
            .add_rule(strict_rule("S2", vec![], Literal::positive("p").negate()))
            .unwrap_err();
        assert!(matches!(err, ArgueError::KbError { .. }));
        assert_eq!(kb.proofs().count(), 1);
    }

    #[test]
    fn strict_rule_contraposition_is_generated_and_usable() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(strict_rule(
            "S1",
            vec!["a"],
            Literal::positive("b"),
        ))
        .unwrap();
        kb.add_rule(strict_rule("S2", vec![], Literal::positive("b").negate()))
            .unwrap();
        // contraposition of S1 is `-b --> -a`; with -b proven, -a should
        // now be derivable too.
        assert!(kb.proofs_for(&Literal::positive("a").negate()).len() >= 1);
    }

    #[test]
    fn deleting_a_rule_removes_its_proofs() {
        let mut kb = KnowledgeBase::new();
        let id = kb
            .add_rule(strict_rule("S1", vec![], Literal::positive("p")))
            .unwrap();
        kb.del_rule(id).unwrap();
        assert_eq!(kb.proofs().count(), 0);
    }

    #[test]
    fn batch_mode_suppresses_recalculation_until_explicit_call() {
        let mut kb = KnowledgeBase::new();
        kb.set_batch(true);
        kb.add_rule(strict_rule("S1", vec![], Literal::positive("p")))
            .unwrap();
        assert_eq!(kb.proofs().count(), 0);
        kb.set_batch(false);
        kb.recalculate().unwrap();
        assert_eq!(kb.proofs().count(), 1);
    }

    #[test]
    fn load_file_collects_per_line_errors_and_continues() {
        let mut kb = KnowledgeBase::new();
        let text = "--> a\nbad @@ line\n--> b\n";
        let errors = kb.load_file(text).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 2);
        assert_eq!(kb.proofs().count(), 2);
    }

    #[test]
    fn load_file_ignores_blank_and_comment_lines() {
        let mut kb = KnowledgeBase::new();
        let text = "# a comment\n\n--> a   # trailing comment\n";
        let errors = kb.load_file(text).unwrap();
        assert!(errors.is_empty());
        assert_eq!(kb.proofs().count(), 1);
    }

    #[test]
    fn save_round_trips_user_rules_and_orderings() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule(Rule::Defeasible(DefeasibleRule::new(
            Some("D1".into()),
            vec![Literal::positive("p")],
            Literal::positive("q"),
            vec![],
        )))
        .unwrap();
        kb.add_ordering(OrderingRule {
            groups: vec![vec!["D1".into()], vec!["D2".into()]],
        })
        .unwrap();

        let saved = kb.save_to_string();
        let mut kb2 = KnowledgeBase::new();
        let errors = kb2.load_file(&saved).unwrap();
        assert!(errors.is_empty());
        assert_eq!(kb.user_rule_ids.len(), kb2.user_rule_ids.len());
        assert!(kb2.more_preferred("D2", "D1"));
    }

    #[test]
    fn cyclic_ordering_insertion_fails_and_leaves_dag_unchanged() {
        let mut kb = KnowledgeBase::new();
        kb.add_ordering(OrderingRule {
            groups: vec![vec!["R1".into()], vec!["R2".into()]],
        })
        .unwrap();
        let err = kb
            .add_ordering(OrderingRule {
                groups: vec![vec!["R2".into()], vec!["R1".into()]],
            })
            .unwrap_err();
        assert!(matches!(err, ArgueError::KbError { .. }));
        assert!(kb.more_preferred("R2", "R1"));
        assert!(!kb.more_preferred("R1", "R2"));
    }
}
