// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # akh-argue
//!
//! Structured argumentation over a defeasible knowledge base: forward-chaining
//! proof construction, an undercut/rebut attack graph with preference-based
//! defeat, a grounded IN/OUT/UNDEC labelling, and a turn-based persuasion
//! dialogue built on top of it.
//!
//! ## Architecture
//!
//! - **Term model** (`term`): literals, strict/defeasible/ordering rules, a
//!   hand-written recursive-descent parser (`parser`) for the textual rule
//!   syntax.
//! - **Preference graph** (`preference`): a directed acyclic graph over rule
//!   names, inserted and removed in cycle-checked batches.
//! - **Proof construction** (`proof`): forward-chaining closure over working
//!   memory (user rules plus derived contrapositions), loop-free, with
//!   weakest-link computation per proof.
//! - **Knowledge base** (`kb`): owns rules, preferences, and proofs; mediates
//!   edits, batch loading, and `observer` notifications.
//! - **Argument graph** (`argument`): wraps proofs as arguments and derives
//!   undercut/rebut attack edges.
//! - **Labelling** (`labelling`): the grounded IN/OUT/UNDEC fixed point, with
//!   per-argument iteration steps and labelling set algebra.
//! - **Dialogue** (`dialogue`, `players`): a move protocol with commitment
//!   stores and open-issue stacks, driven by automatic player strategies.
//!
//! ## Library usage
//!
//! ```
//! use akh_argue::kb::KnowledgeBase;
//! use akh_argue::argument::ArgumentGraph;
//! use akh_argue::labelling::Labelling;
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_rule_str("-->a").unwrap();
//! kb.add_rule_str("=(-a)=>b").unwrap();
//!
//! let mut graph = ArgumentGraph::new();
//! graph.rebuild(&kb);
//! let labelling = Labelling::grounded(&graph);
//! assert_eq!(labelling.in_arguments().len(), 1);
//! ```

pub mod argument;
pub mod dialogue;
pub mod error;
pub mod kb;
pub mod labelling;
pub mod observer;
pub mod parser;
pub mod players;
pub mod preference;
pub mod proof;
pub mod term;
