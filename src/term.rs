//! Term model: literals, strict and defeasible rules, and preference
//! orderings.
//!
//! These are plain value types — no behavior beyond equality, ordering,
//! hashing, and display lives here. The forward-chaining closure (`proof`),
//! the preference graph (`preference`), and the knowledge base (`kb`) build
//! on top of these values rather than extending them.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A propositional atom, optionally negated.
///
/// Equality and hashing are by `(name, negated)`. Ordering is by name
/// (lexicographic), then by `negated` (`false < true`, so `a` sorts before
/// `-a`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    pub name: String,
    pub negated: bool,
}

impl Literal {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        Literal {
            name: name.into(),
            negated,
        }
    }

    pub fn positive(name: impl Into<String>) -> Self {
        Literal::new(name, false)
    }

    /// Logical negation: `-L`. Flips the `negated` flag, leaves the name.
    pub fn negate(&self) -> Literal {
        Literal {
            name: self.name.clone(),
            negated: !self.negated,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.negated == other.negated
    }
}
impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.negated.hash(state);
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then(self.negated.cmp(&other.negated))
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "-{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// A modus-ponens rule whose conclusion follows necessarily from its
/// antecedents.
///
/// The antecedent is stored sorted so that equality and hashing are
/// order-independent. `name` is metadata only: it does not participate in
/// equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrictRule {
    pub name: Option<String>,
    pub antecedent: Vec<Literal>,
    pub consequent: Literal,
}

impl StrictRule {
    pub fn new(name: Option<String>, mut antecedent: Vec<Literal>, consequent: Literal) -> Self {
        antecedent.sort();
        StrictRule {
            name,
            antecedent,
            consequent,
        }
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.to_string())
    }
}

impl PartialEq for StrictRule {
    fn eq(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent && self.consequent == other.consequent
    }
}
impl Eq for StrictRule {}

impl Hash for StrictRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for lit in &self.antecedent {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            lit.hash(&mut h);
            acc ^= h.finish();
        }
        acc.hash(state);
        self.consequent.hash(state);
    }
}

impl PartialOrd for StrictRule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrictRule {
    fn cmp(&self, other: &Self) -> Ordering {
        self.antecedent
            .len()
            .cmp(&other.antecedent.len())
            .then_with(|| self.to_string().cmp(&other.to_string()))
    }
}

impl std::fmt::Display for StrictRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lits = self
            .antecedent
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{} --> {}", lits, self.consequent)
    }
}

/// A rule whose conclusion may be defeated by one of its `vulnerabilities`
/// or by a stronger counter-argument.
///
/// Equality and hashing include the (sorted) vulnerability list, unlike
/// [`StrictRule`]'s antecedent/consequent-only equality — two defeasible
/// rules with the same antecedent and consequent but different exceptions
/// are different rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefeasibleRule {
    pub name: Option<String>,
    pub antecedent: Vec<Literal>,
    pub consequent: Literal,
    pub vulnerabilities: Vec<Literal>,
}

impl DefeasibleRule {
    pub fn new(
        name: Option<String>,
        mut antecedent: Vec<Literal>,
        consequent: Literal,
        mut vulnerabilities: Vec<Literal>,
    ) -> Self {
        antecedent.sort();
        vulnerabilities.sort();
        DefeasibleRule {
            name,
            antecedent,
            consequent,
            vulnerabilities,
        }
    }

    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.to_string())
    }
}

impl PartialEq for DefeasibleRule {
    fn eq(&self, other: &Self) -> bool {
        self.antecedent == other.antecedent
            && self.consequent == other.consequent
            && self.vulnerabilities == other.vulnerabilities
    }
}
impl Eq for DefeasibleRule {}

impl Hash for DefeasibleRule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut acc: u64 = 0;
        for lit in &self.antecedent {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            lit.hash(&mut h);
            acc ^= h.finish();
        }
        for lit in &self.vulnerabilities {
            let mut h = std::collections::hash_map::DefaultHasher::new();
            lit.hash(&mut h);
            acc ^= h.finish();
        }
        acc.hash(state);
        self.consequent.hash(state);
    }
}

impl std::fmt::Display for DefeasibleRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lits = self
            .antecedent
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.vulnerabilities.is_empty() {
            write!(f, "{} ==> {}", lits, self.consequent)
        } else {
            let vulns = self
                .vulnerabilities
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "{} =({})=> {}", lits, vulns, self.consequent)
        }
    }
}

/// Tagged union over the two rule kinds, per the "polymorphism over rule
/// kinds" design note: operations common to both (hashing, printing,
/// antecedent access) pattern-match; kind-specific operations
/// (vulnerabilities, contraposition) are only total on their variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Rule {
    Strict(StrictRule),
    Defeasible(DefeasibleRule),
}

impl Rule {
    pub fn name(&self) -> Option<&str> {
        match self {
            Rule::Strict(r) => r.name.as_deref(),
            Rule::Defeasible(r) => r.name.as_deref(),
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Rule::Strict(r) => r.display_name(),
            Rule::Defeasible(r) => r.display_name(),
        }
    }

    pub fn antecedent(&self) -> &[Literal] {
        match self {
            Rule::Strict(r) => &r.antecedent,
            Rule::Defeasible(r) => &r.antecedent,
        }
    }

    pub fn consequent(&self) -> &Literal {
        match self {
            Rule::Strict(r) => &r.consequent,
            Rule::Defeasible(r) => &r.consequent,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Rule::Strict(_))
    }

    pub fn vulnerabilities(&self) -> &[Literal] {
        match self {
            Rule::Strict(_) => &[],
            Rule::Defeasible(r) => &r.vulnerabilities,
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Strict(a), Rule::Strict(b)) => a == b,
            (Rule::Defeasible(a), Rule::Defeasible(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Rule {}

impl Hash for Rule {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Rule::Strict(r) => {
                0u8.hash(state);
                r.hash(state);
            }
            Rule::Defeasible(r) => {
                1u8.hash(state);
                r.hash(state);
            }
        }
    }
}

/// A strict rule is always greater (more preferred in default rule
/// ordering) than any defeasible rule; within a kind, ties break on
/// antecedent count then textual form.
impl PartialOrd for Rule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rule {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Rule::Strict(a), Rule::Strict(b)) => a.cmp(b),
            (Rule::Defeasible(_), Rule::Strict(_)) => Ordering::Less,
            (Rule::Strict(_), Rule::Defeasible(_)) => Ordering::Greater,
            (Rule::Defeasible(a), Rule::Defeasible(b)) => a
                .antecedent
                .len()
                .cmp(&b.antecedent.len())
                .then_with(|| a.to_string().cmp(&b.to_string())),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Strict(r) => write!(f, "{r}"),
            Rule::Defeasible(r) => write!(f, "{r}"),
        }
    }
}

/// One `<`-chained group of a parsed preference ordering, e.g.
/// `R1 < R2, R3 < R4`: a sequence of rule-name groups where every name in a
/// later group is strictly more preferred than every name in the
/// immediately preceding group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingRule {
    /// Groups in increasing order of preference (rightmost = most preferred).
    pub groups: Vec<Vec<String>>,
}

impl OrderingRule {
    /// Every `(higher, lower)` name pair this ordering implies, in the order
    /// `insert_ordering`/`delete_ordering` should apply/remove them.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for window in self.groups.windows(2) {
            let (lower, higher) = (&window[0], &window[1]);
            for h in higher {
                for l in lower {
                    out.push((h.clone(), l.clone()));
                }
            }
        }
        out
    }
}
