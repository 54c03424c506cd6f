//! Flat diagnostic error type for the argumentation engine.
//!
//! Every fallible public operation returns [`ArgueResult`]. Variants carry
//! `miette` `#[diagnostic]` metadata so a host can render rich terminal
//! diagnostics, but the taxonomy itself stays flat: there is exactly one
//! kind per failure mode named by the reasoning pipeline, not a tree of
//! per-subsystem wrapper enums.

use miette::Diagnostic;
use thiserror::Error;

/// The error type returned by every fallible operation in this crate.
#[derive(Debug, Error, Diagnostic)]
pub enum ArgueError {
    #[error("parse error: {message}")]
    #[diagnostic(
        code(argue::parse_error),
        help(
            "The input did not match the rule grammar (literal, strict rule, \
             defeasible rule, or ordering). Check spelling, arrows (`-->`, `=(...)=>`), \
             and that identifiers start with a letter or underscore."
        )
    )]
    ParseError {
        message: String,
        line: Option<usize>,
    },

    #[error("rule error: {message}")]
    #[diagnostic(
        code(argue::rule_error),
        help(
            "The rule is structurally invalid: a consequent is missing, or a \
             slot holds the wrong kind of literal."
        )
    )]
    RuleError { message: String },

    #[error("knowledge base error: {message}")]
    #[diagnostic(
        code(argue::kb_error),
        help(
            "The knowledge base rejected a semantic change: a cyclic preference \
             ordering, two strict proofs with complementary consequents, or a \
             defeasible rule name reused with a different body."
        )
    )]
    KbError { message: String },

    #[error("illegal argument: {message}")]
    #[diagnostic(
        code(argue::illegal_argument),
        help("The referenced argument or label does not exist in this labelling.")
    )]
    IllegalArgument { message: String },

    #[error("illegal move: {message}")]
    #[diagnostic(
        code(argue::illegal_move),
        help(
            "The move violates a dialogue precondition (sequencing, open-issue \
             membership, or contradiction with a prior open issue)."
        )
    )]
    IllegalMove { message: String },

    #[error("not your move: {message}")]
    #[diagnostic(
        code(argue::not_your_move),
        help("This move can only be played by the proponent or the opponent, not both.")
    )]
    NotYourMove { message: String },

    #[error("no more moves available")]
    #[diagnostic(
        code(argue::no_more_moves),
        help("The automatic player has no legal response left to play.")
    )]
    NoMoreMoves,

    #[error("method not applicable: {message}")]
    #[diagnostic(
        code(argue::method_not_applicable),
        help(
            "The operation assumes an invariant on the labelling that does not \
             hold here (for example, asking for the single label of a labelling \
             that assigns more than one)."
        )
    )]
    MethodNotApplicable { message: String },
}

/// Convenience alias for functions returning `akh-argue` results.
pub type ArgueResult<T> = std::result::Result<T, ArgueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_line_number() {
        let err = ArgueError::ParseError {
            message: "unexpected token".into(),
            line: Some(3),
        };
        assert!(matches!(err, ArgueError::ParseError { line: Some(3), .. }));
    }

    #[test]
    fn display_messages_are_descriptive() {
        let err = ArgueError::KbError {
            message: "cyclic preference ordering".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("cyclic preference ordering"));
    }

    #[test]
    fn no_more_moves_has_no_payload() {
        let err = ArgueError::NoMoreMoves;
        assert_eq!(format!("{err}"), "no more moves available");
    }
}
