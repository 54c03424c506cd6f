//! Persuasion dialogue engine (C8): a labelling, two players, an ordered
//! move history, and an open-issues stack.
//!
//! Move preconditions differ between the "grounded" variant (role and
//! sequencing enforced, per `GroundedDiscussion`) and a "relaxed" variant
//! used for off-line replay (`SimpleDiscussion`), which keeps the same
//! bookkeeping but skips those checks. Both share one implementation,
//! parameterised over a [`DialoguePolicy`] so the bookkeeping is written
//! once.

use crate::argument::ArgumentId;
use crate::error::{ArgueError, ArgueResult};
use crate::labelling::{Label, Labelling};
use std::marker::PhantomData;

/// Which side of the dialogue a player occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerRole {
    Proponent,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Claim,
    Why,
    Because,
    Concede,
    Retract,
    Question,
    Disagree,
}

/// An argument paired with the label it is being asserted/challenged under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelledArgument {
    pub argument: ArgumentId,
    pub label: Label,
}

impl std::fmt::Display for LabelledArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.label {
            Label::In => "IN",
            Label::Out => "OUT",
            Label::Undec => "UNDEC",
        };
        write!(f, "{label}({})", self.argument.0)
    }
}

#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub player: PlayerRole,
    pub kind: MoveKind,
    pub target: LabelledArgument,
}

/// Preconditions one dialogue variant enforces per move kind. All methods
/// receive precomputed predicates (rather than the whole dialogue) so the
/// bookkeeping in [`Dialogue`] stays identical across variants.
pub trait DialoguePolicy {
    fn check_claim(role: PlayerRole, is_first_move: bool) -> ArgueResult<()>;
    fn check_why(
        role: PlayerRole,
        proponent_committed: bool,
        is_contradicting: bool,
    ) -> ArgueResult<()>;
    fn check_because(
        role: PlayerRole,
        no_moves_yet: bool,
        last_move_was_because: bool,
        already_open_issue: bool,
        is_contradicting: bool,
    ) -> ArgueResult<()>;
    fn check_concede(role: PlayerRole, open_issues_empty: bool) -> ArgueResult<()>;
    fn check_retract(is_open_issue: bool) -> ArgueResult<()>;
}

/// Full role and sequencing enforcement, per `GroundedDiscussion`.
pub struct Grounded;

impl DialoguePolicy for Grounded {
    fn check_claim(role: PlayerRole, is_first_move: bool) -> ArgueResult<()> {
        if role != PlayerRole::Proponent {
            return Err(ArgueError::NotYourMove {
                message: "only the proponent can claim".into(),
            });
        }
        if !is_first_move {
            return Err(ArgueError::IllegalMove {
                message: "claim can only be used at the beginning of the discussion".into(),
            });
        }
        Ok(())
    }

    fn check_why(
        role: PlayerRole,
        proponent_committed: bool,
        is_contradicting: bool,
    ) -> ArgueResult<()> {
        if role != PlayerRole::Opponent {
            return Err(ArgueError::NotYourMove {
                message: "only the opponent can ask why".into(),
            });
        }
        if !proponent_committed {
            return Err(ArgueError::IllegalMove {
                message: "target is not an issue the proponent is committed to".into(),
            });
        }
        if is_contradicting {
            return Err(ArgueError::IllegalMove {
                message: "this argument was already used with a different label; use retract"
                    .into(),
            });
        }
        Ok(())
    }

    fn check_because(
        role: PlayerRole,
        no_moves_yet: bool,
        last_move_was_because: bool,
        already_open_issue: bool,
        is_contradicting: bool,
    ) -> ArgueResult<()> {
        if role != PlayerRole::Proponent {
            return Err(ArgueError::NotYourMove {
                message: "only the proponent can use because".into(),
            });
        }
        if no_moves_yet {
            return Err(ArgueError::IllegalMove {
                message: "there are no open issues, play claim first".into(),
            });
        }
        if last_move_was_because {
            return Err(ArgueError::IllegalMove {
                message: "cannot play because twice in a row".into(),
            });
        }
        if already_open_issue {
            return Err(ArgueError::IllegalMove {
                message: "this argument is already an open issue".into(),
            });
        }
        if is_contradicting {
            return Err(ArgueError::IllegalMove {
                message: "this argument was already used with a different label; use retract"
                    .into(),
            });
        }
        Ok(())
    }

    fn check_concede(role: PlayerRole, open_issues_empty: bool) -> ArgueResult<()> {
        if role != PlayerRole::Opponent {
            return Err(ArgueError::NotYourMove {
                message: "only the opponent can concede".into(),
            });
        }
        if open_issues_empty {
            return Err(ArgueError::IllegalMove {
                message: "there are no open issues".into(),
            });
        }
        Ok(())
    }

    fn check_retract(is_open_issue: bool) -> ArgueResult<()> {
        if !is_open_issue {
            return Err(ArgueError::IllegalMove {
                message: "target is not an open issue".into(),
            });
        }
        Ok(())
    }
}

/// Omits role and sequencing checks (used for off-line replay); bookkeeping
/// (commitment updates, open-issue stack) is unchanged.
pub struct Relaxed;

impl DialoguePolicy for Relaxed {
    fn check_claim(_role: PlayerRole, _is_first_move: bool) -> ArgueResult<()> {
        Ok(())
    }
    fn check_why(_role: PlayerRole, _proponent_committed: bool, _is_contradicting: bool) -> ArgueResult<()> {
        Ok(())
    }
    fn check_because(
        _role: PlayerRole,
        _no_moves_yet: bool,
        _last_move_was_because: bool,
        _already_open_issue: bool,
        _is_contradicting: bool,
    ) -> ArgueResult<()> {
        Ok(())
    }
    fn check_concede(_role: PlayerRole, _open_issues_empty: bool) -> ArgueResult<()> {
        Ok(())
    }
    fn check_retract(_is_open_issue: bool) -> ArgueResult<()> {
        Ok(())
    }
}

/// A persuasion dialogue over a fixed [`Labelling`], generic over the
/// precondition policy ([`Grounded`] or [`Relaxed`]).
pub struct Dialogue<P: DialoguePolicy> {
    labelling: Labelling,
    proponent_commitment: Labelling,
    opponent_commitment: Labelling,
    moves: Vec<MoveRecord>,
    open_issues: Vec<LabelledArgument>,
    _policy: PhantomData<P>,
}

impl<P: DialoguePolicy> Dialogue<P> {
    pub fn new(labelling: Labelling) -> Self {
        Dialogue {
            labelling,
            proponent_commitment: Labelling::empty(),
            opponent_commitment: Labelling::empty(),
            moves: Vec::new(),
            open_issues: Vec::new(),
            _policy: PhantomData,
        }
    }

    pub fn labelling(&self) -> &Labelling {
        &self.labelling
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn open_issues(&self) -> &[LabelledArgument] {
        &self.open_issues
    }

    pub fn commitment_of(&self, role: PlayerRole) -> &Labelling {
        match role {
            PlayerRole::Proponent => &self.proponent_commitment,
            PlayerRole::Opponent => &self.opponent_commitment,
        }
    }

    pub fn is_open_issue(&self, target: LabelledArgument) -> bool {
        self.open_issues.contains(&target)
    }

    pub fn is_committed_to(&self, role: PlayerRole, target: LabelledArgument) -> bool {
        self.commitment_of(role).label_of(target.argument) == Some(target.label)
    }

    /// True if `target`'s argument was already placed under a different
    /// label in the open-issues stack.
    fn is_contradicting(&self, target: LabelledArgument) -> bool {
        self.open_issues
            .iter()
            .any(|oi| oi.argument == target.argument && *oi != target)
    }

    fn last_move_kind(&self) -> Option<MoveKind> {
        self.moves.last().map(|m| m.kind)
    }

    fn update_commitment(&mut self, role: PlayerRole, target: LabelledArgument) {
        let step = self.labelling.step_of(target.argument).unwrap_or(0);
        let delta = Labelling::singleton(target.argument, target.label, step);
        let updated = match role {
            PlayerRole::Proponent => self.proponent_commitment.union(&delta),
            PlayerRole::Opponent => self.opponent_commitment.union(&delta),
        };
        match role {
            PlayerRole::Proponent => self.proponent_commitment = updated,
            PlayerRole::Opponent => self.opponent_commitment = updated,
        }
    }

    fn push(&mut self, player: PlayerRole, kind: MoveKind, target: LabelledArgument) {
        self.moves.push(MoveRecord {
            player,
            kind,
            target,
        });
    }

    /// Play one move. Dialogue state (moves, open issues, commitments) is
    /// left unchanged if the move is rejected.
    pub fn make_move(
        &mut self,
        player: PlayerRole,
        kind: MoveKind,
        target: LabelledArgument,
    ) -> ArgueResult<()> {
        match kind {
            MoveKind::Claim => self.claim(player, target),
            MoveKind::Why => self.why(player, target),
            MoveKind::Because => self.because(player, target),
            MoveKind::Concede => self.concede(player, target),
            MoveKind::Retract => self.retract(player, target),
            MoveKind::Question => Ok(()),
            MoveKind::Disagree => Ok(()),
        }
    }

    fn claim(&mut self, player: PlayerRole, target: LabelledArgument) -> ArgueResult<()> {
        P::check_claim(player, self.moves.is_empty())?;
        self.update_commitment(player, target);
        self.open_issues.push(target);
        self.push(player, MoveKind::Claim, target);
        Ok(())
    }

    fn why(&mut self, player: PlayerRole, target: LabelledArgument) -> ArgueResult<()> {
        let proponent_committed = self.is_committed_to(PlayerRole::Proponent, target);
        let contradicting = self.is_contradicting(target);
        P::check_why(player, proponent_committed, contradicting)?;
        if !self.is_open_issue(target) {
            self.open_issues.push(target);
        }
        self.push(player, MoveKind::Why, target);
        Ok(())
    }

    fn because(&mut self, player: PlayerRole, target: LabelledArgument) -> ArgueResult<()> {
        let no_moves_yet = self.moves.is_empty();
        let last_was_because = self.last_move_kind() == Some(MoveKind::Because);
        let already_open = self.is_open_issue(target);
        let contradicting = self.is_contradicting(target);
        P::check_because(player, no_moves_yet, last_was_because, already_open, contradicting)?;
        self.open_issues.push(target);
        self.update_commitment(player, target);
        self.push(player, MoveKind::Because, target);
        Ok(())
    }

    fn concede(&mut self, player: PlayerRole, target: LabelledArgument) -> ArgueResult<()> {
        P::check_concede(player, self.open_issues.is_empty())?;
        self.update_commitment(player, target);
        self.push(player, MoveKind::Concede, target);
        self.concede_upto(target);
        Ok(())
    }

    fn concede_upto(&mut self, target: LabelledArgument) {
        if let Some(idx) = self.open_issues.iter().position(|oi| *oi == target) {
            self.open_issues.truncate(idx);
        }
    }

    fn retract(&mut self, player: PlayerRole, target: LabelledArgument) -> ArgueResult<()> {
        P::check_retract(self.is_open_issue(target))?;
        self.open_issues.retain(|oi| *oi != target);
        self.push(player, MoveKind::Retract, target);
        Ok(())
    }
}
