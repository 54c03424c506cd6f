//! Grounded labelling (C7): the monotone upward-complete IN/OUT/UNDEC fixed
//! point over an argument graph, plus the set algebra used by the dialogue
//! engine's commitment stores.

use std::collections::HashSet;
use std::collections::HashMap;

use crate::argument::{ArgumentGraph, ArgumentId};
use crate::error::{ArgueError, ArgueResult};

/// A single argument's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    In,
    Out,
    Undec,
}

/// A three-way partition of arguments, with the iteration round at which
/// each decided argument was settled.
#[derive(Debug, Clone, Default)]
pub struct Labelling {
    pub(crate) in_set: HashSet<ArgumentId>,
    pub(crate) out_set: HashSet<ArgumentId>,
    pub(crate) undec_set: HashSet<ArgumentId>,
    pub(crate) steps: HashMap<ArgumentId, u32>,
}

impl Labelling {
    /// The labelling with all three sets empty.
    pub fn empty() -> Self {
        Labelling::default()
    }

    pub fn is_empty(&self) -> bool {
        self.in_set.is_empty() && self.out_set.is_empty() && self.undec_set.is_empty()
    }

    pub fn label_of(&self, id: ArgumentId) -> Option<Label> {
        if self.in_set.contains(&id) {
            Some(Label::In)
        } else if self.out_set.contains(&id) {
            Some(Label::Out)
        } else if self.undec_set.contains(&id) {
            Some(Label::Undec)
        } else {
            None
        }
    }

    pub fn step_of(&self, id: ArgumentId) -> Option<u32> {
        self.steps.get(&id).copied()
    }

    pub fn in_arguments(&self) -> &HashSet<ArgumentId> {
        &self.in_set
    }

    pub fn out_arguments(&self) -> &HashSet<ArgumentId> {
        &self.out_set
    }

    pub fn undec_arguments(&self) -> &HashSet<ArgumentId> {
        &self.undec_set
    }

    /// A labelling containing exactly `(id, label)`.
    pub fn singleton(id: ArgumentId, label: Label, step: u32) -> Self {
        let mut l = Labelling::empty();
        match label {
            Label::In => {
                l.in_set.insert(id);
            }
            Label::Out => {
                l.out_set.insert(id);
            }
            Label::Undec => {
                l.undec_set.insert(id);
            }
        }
        l.steps.insert(id, step);
        l
    }

    /// True iff `a` is legally IN given the CURRENT labelling: every
    /// attacker is in `OUT`.
    fn legally_in(&self, a: &crate::argument::Argument) -> bool {
        a.minus.iter().all(|x| self.out_set.contains(x))
    }

    /// True iff `a` is legally OUT: at least one attacker in `IN`.
    fn legally_out(&self, a: &crate::argument::Argument) -> bool {
        a.minus.iter().any(|x| self.in_set.contains(x))
    }

    /// True iff `a` is legally UNDEC: no attacker in `IN` and at least one
    /// attacker in `UNDEC`. (The source's `is_undec` compared a function
    /// object rather than invoking it; this is the corrected predicate.)
    #[allow(dead_code)]
    fn legally_undec(&self, a: &crate::argument::Argument) -> bool {
        !a.minus.iter().any(|x| self.in_set.contains(x))
            && a.minus.iter().any(|x| self.undec_set.contains(x))
    }

    /// Compute the grounded labelling of `graph`: start with every argument
    /// UNDEC, then repeatedly promote newly-legal arguments to IN/OUT until
    /// a round makes no change, at which point every remaining UNDEC
    /// argument is stamped with the final round index.
    pub fn grounded(graph: &ArgumentGraph) -> Labelling {
        let mut labelling = Labelling::empty();
        for a in graph.arguments() {
            labelling.undec_set.insert(a.id);
        }

        let mut round: u32 = 0;
        loop {
            round += 1;
            let mut new_in = Vec::new();
            let mut new_out = Vec::new();

            for a in graph.arguments() {
                if !labelling.undec_set.contains(&a.id) {
                    continue;
                }
                if labelling.legally_in(a) {
                    new_in.push(a.id);
                } else if labelling.legally_out(a) {
                    new_out.push(a.id);
                }
            }

            if new_in.is_empty() && new_out.is_empty() {
                let step = round;
                for id in labelling.undec_set.iter().copied().collect::<Vec<_>>() {
                    labelling.steps.entry(id).or_insert(step);
                }
                break;
            }

            for id in new_in {
                labelling.undec_set.remove(&id);
                labelling.in_set.insert(id);
                labelling.steps.insert(id, round);
            }
            for id in new_out {
                labelling.undec_set.remove(&id);
                labelling.out_set.insert(id);
                labelling.steps.insert(id, round);
            }
        }

        labelling
    }

    /// `self ∩ other`: IN∩IN, OUT∩OUT; everything else UNDEC.
    pub fn intersection(&self, other: &Labelling, universe: &[ArgumentId]) -> Labelling {
        let mut out = Labelling::empty();
        for &id in universe {
            if self.in_set.contains(&id) && other.in_set.contains(&id) {
                out.in_set.insert(id);
            } else if self.out_set.contains(&id) && other.out_set.contains(&id) {
                out.out_set.insert(id);
            } else {
                out.undec_set.insert(id);
            }
        }
        out
    }

    /// `self ∪ other`, preferring IN over OUT on disagreement:
    /// `IN ∪= other.IN \ OUT`, then `OUT ∪= other.OUT \ IN`.
    pub fn union(&self, other: &Labelling) -> Labelling {
        let mut out = self.clone();
        for id in &other.in_set {
            if !out.out_set.contains(id) {
                out.in_set.insert(*id);
                out.undec_set.remove(id);
            }
        }
        for id in &other.out_set {
            if !out.in_set.contains(id) {
                out.out_set.insert(*id);
                out.undec_set.remove(id);
            }
        }
        for id in &other.undec_set {
            if !out.in_set.contains(id) && !out.out_set.contains(id) {
                out.undec_set.insert(*id);
            }
        }
        out
    }

    /// Arguments in `self` whose label is absent from `other` entirely.
    pub fn difference(&self, other: &Labelling) -> HashSet<ArgumentId> {
        let mut out = HashSet::new();
        for id in self.in_set.iter().chain(self.out_set.iter()).chain(self.undec_set.iter()) {
            if other.label_of(*id).is_none() {
                out.insert(*id);
            }
        }
        out
    }

    /// Arguments whose label in `self` and `other` disagree (symmetric
    /// difference across labels — an argument labelled in both but with
    /// different labels still counts).
    pub fn diffargs(&self, other: &Labelling) -> HashSet<ArgumentId> {
        let mut all: HashSet<ArgumentId> = HashSet::new();
        all.extend(self.in_set.iter().chain(self.out_set.iter()).chain(self.undec_set.iter()));
        all.extend(other.in_set.iter().chain(other.out_set.iter()).chain(other.undec_set.iter()));
        all.into_iter()
            .filter(|id| self.label_of(*id) != other.label_of(*id))
            .collect()
    }

    /// `self ⊆ other` iff each of the three sets is a subset of the
    /// corresponding set in `other`.
    pub fn is_sub_labelling(&self, other: &Labelling) -> bool {
        self.in_set.is_subset(&other.in_set)
            && self.out_set.is_subset(&other.out_set)
            && self.undec_set.is_subset(&other.undec_set)
    }

    /// One single-argument labelling per labelled argument in `self`.
    pub fn split(&self) -> Vec<Labelling> {
        let mut out = Vec::new();
        for &id in &self.in_set {
            out.push(Labelling::singleton(id, Label::In, self.steps.get(&id).copied().unwrap_or(0)));
        }
        for &id in &self.out_set {
            out.push(Labelling::singleton(id, Label::Out, self.steps.get(&id).copied().unwrap_or(0)));
        }
        for &id in &self.undec_set {
            out.push(Labelling::singleton(id, Label::Undec, self.steps.get(&id).copied().unwrap_or(0)));
        }
        out
    }

    /// Require that exactly one argument is labelled in this labelling and
    /// return its label. Used by callers that expect a single-assessment
    /// labelling (e.g. a commitment delta); fails with
    /// `MethodNotApplicable` otherwise.
    pub fn single_label(&self) -> ArgueResult<(ArgumentId, Label)> {
        let total = self.in_set.len() + self.out_set.len() + self.undec_set.len();
        if total != 1 {
            return Err(ArgueError::MethodNotApplicable {
                message: format!(
                    "single_label requires exactly one labelled argument, found {total}"
                ),
            });
        }
        if let Some(&id) = self.in_set.iter().next() {
            return Ok((id, Label::In));
        }
        if let Some(&id) = self.out_set.iter().next() {
            return Ok((id, Label::Out));
        }
        let id = *self.undec_set.iter().next().unwrap();
        Ok((id, Label::Undec))
    }
}
