//! Automatic player strategies (C9): base, sceptical, and smart move
//! selection built on a dialogue's labelling and commitment stores.
//!
//! Rather than an inheritance hierarchy of player subclasses, the three
//! strategies are one tagged variant sharing a single commitment/role state
//! — the same "polymorphism over kinds" choice used for [`crate::term::Rule`].
//!
//! Deviation from the source: the source picks a random opening argument
//! when a discussion has no moves yet; since probabilistic/random selection
//! is out of scope here, the opening argument is the first in the argument
//! graph's dense order (deterministic, documented in `DESIGN.md`).

use std::collections::HashSet;

use crate::argument::{ArgumentGraph, ArgumentId};
use crate::dialogue::{Dialogue, DialoguePolicy, LabelledArgument, MoveKind, PlayerRole};
use crate::error::{ArgueError, ArgueResult};
use crate::labelling::{Label, Labelling};

/// What an automatic player decided to do in response to the current
/// dialogue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Move(MoveKind, LabelledArgument),
    /// BECAUSE with no attacker to cite — rendered as "no attackers" by the
    /// driver (scenario 5).
    NoAttackers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStrategy {
    Base,
    Sceptical,
    Smart,
}

/// An automatic player: a role, a cumulative commitment store, and a
/// strategy governing `make_move`.
#[derive(Debug, Clone)]
pub struct Player {
    role: PlayerRole,
    commitment: Labelling,
    strategy: PlayerStrategy,
}

impl Player {
    pub fn new(role: PlayerRole, strategy: PlayerStrategy) -> Self {
        Player {
            role,
            commitment: Labelling::empty(),
            strategy,
        }
    }

    pub fn role(&self) -> PlayerRole {
        self.role
    }

    pub fn commitment(&self) -> &Labelling {
        &self.commitment
    }

    pub fn is_committed_to(&self, target: LabelledArgument) -> bool {
        self.commitment.label_of(target.argument) == Some(target.label)
    }

    fn update_commitment(&mut self, target: LabelledArgument, step: u32) {
        let delta = Labelling::singleton(target.argument, target.label, step);
        self.commitment = self.commitment.union(&delta);
    }

    /// Decide and return the next move given the current dialogue state,
    /// without playing it — the caller is responsible for feeding the
    /// result into [`Dialogue::make_move`].
    pub fn make_move<P: DialoguePolicy>(
        &mut self,
        dialogue: &Dialogue<P>,
        graph: &ArgumentGraph,
    ) -> ArgueResult<Option<MoveOutcome>> {
        if dialogue.moves().is_empty() {
            let Some(first) = graph.arguments().first() else {
                return Ok(None);
            };
            let label = dialogue
                .labelling()
                .label_of(first.id)
                .unwrap_or(Label::Undec);
            return Ok(Some(MoveOutcome::Move(
                MoveKind::Claim,
                LabelledArgument {
                    argument: first.id,
                    label,
                },
            )));
        }

        let last = dialogue.moves().last().unwrap();
        match last.kind {
            MoveKind::Claim | MoveKind::Because | MoveKind::Question => {
                self.answer_because(dialogue, graph, last.target)
            }
            MoveKind::Why => self.answer_why(dialogue, graph, last.target),
            MoveKind::Concede => self.answer_concede(dialogue),
            MoveKind::Retract | MoveKind::Disagree => Ok(None),
        }
    }

    fn answer_because<P: DialoguePolicy>(
        &mut self,
        dialogue: &Dialogue<P>,
        graph: &ArgumentGraph,
        cited: LabelledArgument,
    ) -> ArgueResult<Option<MoveOutcome>> {
        let Some(&loi) = dialogue.open_issues().last() else {
            return Ok(None);
        };

        if self.strategy == PlayerStrategy::Smart {
            if loi.label == Label::Undec {
                self.update_commitment(loi, step_of(dialogue, loi));
                return Ok(Some(MoveOutcome::Move(MoveKind::Concede, loi)));
            }
            if self.is_valid_reason_for(graph, cited, loi) {
                self.update_commitment(cited, step_of(dialogue, cited));
            }
        }

        Ok(Some(self.ask_why_or_concede(dialogue, loi)))
    }

    fn answer_why<P: DialoguePolicy>(
        &mut self,
        dialogue: &Dialogue<P>,
        graph: &ArgumentGraph,
        loi: LabelledArgument,
    ) -> ArgueResult<Option<MoveOutcome>> {
        let mut attackers = possible_attackers(graph, dialogue.labelling(), dialogue.open_issues(), loi);
        attackers.retain(|a| self.commitment.label_of(a.argument).is_none());

        match lowest_step(dialogue, &attackers) {
            None => Ok(Some(MoveOutcome::NoAttackers)),
            Some(attacker) => {
                self.update_commitment(attacker, step_of(dialogue, attacker));
                Ok(Some(MoveOutcome::Move(MoveKind::Because, attacker)))
            }
        }
    }

    fn answer_concede<P: DialoguePolicy>(
        &mut self,
        dialogue: &Dialogue<P>,
    ) -> ArgueResult<Option<MoveOutcome>> {
        if dialogue.open_issues().is_empty() {
            return Err(ArgueError::NoMoreMoves);
        }
        let loi = *dialogue.open_issues().last().unwrap();
        Ok(Some(self.ask_why_or_concede(dialogue, loi)))
    }

    /// Base/sceptical "do I agree with the labelling on this open issue?"
    /// check, varying by strategy: base compares against the dialogue's
    /// labelling directly; sceptical and smart require the label to already
    /// be justified by the player's own commitment store.
    fn ask_why_or_concede<P: DialoguePolicy>(
        &mut self,
        dialogue: &Dialogue<P>,
        loi: LabelledArgument,
    ) -> MoveOutcome {
        let agrees = match self.strategy {
            PlayerStrategy::Base => dialogue.labelling().label_of(loi.argument) == Some(loi.label),
            PlayerStrategy::Sceptical | PlayerStrategy::Smart => is_justified(loi, &self.commitment),
        };
        if agrees {
            self.update_commitment(loi, step_of(dialogue, loi));
            MoveOutcome::Move(MoveKind::Concede, loi)
        } else {
            MoveOutcome::Move(MoveKind::Why, loi)
        }
    }

    /// Smart player's validity check for a cited BECAUSE reason: it must be
    /// justified under the player's own commitment and must actually attack
    /// the open issue it was cited for.
    fn is_valid_reason_for(
        &self,
        graph: &ArgumentGraph,
        reason: LabelledArgument,
        issue: LabelledArgument,
    ) -> bool {
        if !is_justified(reason, &self.commitment) {
            return false;
        }
        graph
            .argument(issue.argument)
            .map(|a| a.minus.contains(&reason.argument))
            .unwrap_or(false)
    }
}

/// True if `target`'s asserted label already matches `reference`'s label
/// for that argument, or `reference` is the empty labelling.
fn is_justified(target: LabelledArgument, reference: &Labelling) -> bool {
    reference.is_empty() || reference.label_of(target.argument) == Some(target.label)
}

fn step_of<P: DialoguePolicy>(dialogue: &Dialogue<P>, target: LabelledArgument) -> u32 {
    dialogue.labelling().step_of(target.argument).unwrap_or(0)
}

/// Attackers of `target`'s argument that are not already open issues,
/// excluding attackers labelled UNDEC or sharing `target`'s label.
fn possible_attackers(
    graph: &ArgumentGraph,
    labelling: &Labelling,
    open_issues: &[LabelledArgument],
    target: LabelledArgument,
) -> Vec<LabelledArgument> {
    let Some(arg) = graph.argument(target.argument) else {
        return Vec::new();
    };
    let oi_args: HashSet<ArgumentId> = open_issues.iter().map(|oi| oi.argument).collect();

    arg.minus
        .iter()
        .filter(|id| !oi_args.contains(id))
        .filter_map(|id| labelling.label_of(*id).map(|label| LabelledArgument { argument: *id, label }))
        .filter(|la| la.label != Label::Undec && la.label != target.label)
        .collect()
}

fn lowest_step<P: DialoguePolicy>(
    dialogue: &Dialogue<P>,
    attackers: &[LabelledArgument],
) -> Option<LabelledArgument> {
    attackers
        .iter()
        .copied()
        .min_by_key(|a| dialogue.labelling().step_of(a.argument).unwrap_or(u32::MAX))
}
