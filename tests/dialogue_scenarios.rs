//! End-to-end coverage of the seed scenarios against the public crate API
//! only (no internal module access), exercising knowledge base, argument
//! graph, labelling, and dialogue together.

use akh_argue::argument::ArgumentGraph;
use akh_argue::dialogue::{Dialogue, Grounded, LabelledArgument, MoveKind, PlayerRole};
use akh_argue::kb::KnowledgeBase;
use akh_argue::labelling::{Label, Labelling};
use akh_argue::players::{MoveOutcome, Player, PlayerStrategy};
use akh_argue::term::Literal;

fn build(rules: &[&str]) -> (KnowledgeBase, ArgumentGraph, Labelling) {
    let mut kb = KnowledgeBase::new();
    for r in rules {
        kb.add_rule_str(r).unwrap();
    }
    let mut graph = ArgumentGraph::new();
    graph.rebuild(&kb);
    let labelling = Labelling::grounded(&graph);
    (kb, graph, labelling)
}

fn argument_for<'a>(graph: &'a ArgumentGraph, lit: &Literal) -> &'a akh_argue::argument::Argument {
    graph
        .arguments()
        .iter()
        .find(|a| &a.consequent == lit)
        .expect("no argument for literal")
}

#[test]
fn scenario_1_undercut_yields_in_a_out_b() {
    let (_kb, graph, lab) = build(&["-->a", "=(-a)=>b"]);
    assert_eq!(graph.len(), 2);
    let a = argument_for(&graph, &Literal::positive("a"));
    let b = argument_for(&graph, &Literal::positive("b"));
    assert_eq!(lab.label_of(a.id), Some(Label::In));
    assert_eq!(lab.label_of(b.id), Some(Label::Out));
    assert!(lab.undec_arguments().is_empty());
}

#[test]
fn scenario_2_preference_flips_rebut_direction() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule_str("R1: ==>-b").unwrap();
    kb.add_rule_str("R2: ==>b").unwrap();
    let errors = kb.load_file("R1 < R2\n").unwrap();
    assert!(errors.is_empty());
    let mut graph = ArgumentGraph::new();
    graph.rebuild(&kb);
    let lab = Labelling::grounded(&graph);

    let b = argument_for(&graph, &Literal::positive("b"));
    let not_b = argument_for(&graph, &Literal::positive("b").negate());
    assert_eq!(lab.label_of(b.id), Some(Label::In));
    assert_eq!(lab.label_of(not_b.id), Some(Label::Out));
}

#[test]
fn scenario_3_no_ordering_leaves_both_undec() {
    let (_kb, graph, lab) = build(&["==>a", "==>-a"]);
    let a = argument_for(&graph, &Literal::positive("a"));
    let not_a = argument_for(&graph, &Literal::positive("a").negate());
    assert_eq!(lab.label_of(a.id), Some(Label::Undec));
    assert_eq!(lab.label_of(not_a.id), Some(Label::Undec));
}

#[test]
fn scenario_4_rebut_through_subproof_leaves_c_undec_b_in() {
    let (_kb, graph, lab) = build(&["==>a", "==>-a", "==>b", "a, b ==> c"]);

    let a = argument_for(&graph, &Literal::positive("a"));
    let not_a = argument_for(&graph, &Literal::positive("a").negate());
    let b = argument_for(&graph, &Literal::positive("b"));
    let c = argument_for(&graph, &Literal::positive("c"));

    // -a rebuts c through c's `a` sub-proof.
    assert!(not_a.plus.contains(&c.id));
    assert_eq!(lab.label_of(b.id), Some(Label::In));
    assert_eq!(lab.label_of(a.id), Some(Label::Undec));
    assert_eq!(lab.label_of(not_a.id), Some(Label::Undec));
    assert_eq!(lab.label_of(c.id), Some(Label::Undec));
}

#[test]
fn scenario_5_dialogue_ends_with_opponent_unconvinced() {
    let (_kb, graph, lab) = build(&["-->a", "=(-a)=>b"]);
    let b = argument_for(&graph, &Literal::positive("b"));
    let claim = LabelledArgument {
        argument: b.id,
        label: Label::In,
    };

    let mut d: Dialogue<Grounded> = Dialogue::new(lab);
    d.make_move(PlayerRole::Proponent, MoveKind::Claim, claim)
        .unwrap();
    d.make_move(PlayerRole::Opponent, MoveKind::Why, claim)
        .unwrap();
    assert_eq!(d.open_issues().len(), 1);
    assert_eq!(d.open_issues()[0], claim);

    // The proponent's only candidate defence is A(a), which undercuts
    // IN(b) rather than attacking it the way BECAUSE expects, so the
    // player strategy reports no valid attacker and the game ends with
    // the opponent unconvinced.
    let mut proponent = Player::new(PlayerRole::Proponent, PlayerStrategy::Base);
    let outcome = proponent.make_move(&d, &graph).unwrap().unwrap();
    assert_eq!(outcome, MoveOutcome::NoAttackers);
}

#[test]
fn scenario_6_reinserting_reversed_ordering_is_rejected() {
    let mut kb = KnowledgeBase::new();
    let first = kb.load_file("R1 < R2\n").unwrap();
    assert!(first.is_empty());
    let second = kb.load_file("R2 < R1\n").unwrap();
    assert_eq!(second.len(), 1);
    assert!(matches!(second[0].1, akh_argue::error::ArgueError::KbError { .. }));
    assert!(kb.more_preferred("R2", "R1"));
    assert!(!kb.more_preferred("R1", "R2"));
}

#[test]
fn empty_kb_has_no_proofs_no_arguments_empty_labelling() {
    let kb = KnowledgeBase::new();
    let mut graph = ArgumentGraph::new();
    graph.rebuild(&kb);
    let lab = Labelling::grounded(&graph);
    assert_eq!(kb.proofs().count(), 0);
    assert!(graph.is_empty());
    assert!(lab.is_empty());
}

#[test]
fn axiomatic_rule_yields_one_proof_and_one_in_argument() {
    let (kb, graph, lab) = build(&["-->p"]);
    assert_eq!(kb.proofs().count(), 1);
    assert_eq!(graph.len(), 1);
    assert_eq!(lab.label_of(graph.arguments()[0].id), Some(Label::In));
}

#[test]
fn every_proof_antecedent_matches_its_rule_antecedent() {
    let (kb, _graph, _lab) = build(&["-->a", "a ==> b"]);
    for proof in kb.proofs() {
        let rule = kb.rule(proof.rule).unwrap();
        let proof_lits: std::collections::HashSet<&Literal> = proof.antecedents().into_iter().collect();
        let rule_lits: std::collections::HashSet<&Literal> = rule.antecedent().iter().collect();
        assert_eq!(proof_lits, rule_lits);
    }
}

#[test]
fn argument_attack_edges_are_symmetric() {
    let (_kb, graph, _lab) = build(&["==>a", "==>-a"]);
    for a in graph.arguments() {
        for attacker in &a.minus {
            let x = graph.argument(*attacker).unwrap();
            assert!(x.plus.contains(&a.id));
        }
    }
}

#[test]
fn grounded_labelling_is_a_legal_partition_covering_every_argument() {
    let (_kb, graph, lab) = build(&["==>a", "==>-a", "==>b", "a, b ==> c", "-->d", "=(-d)=>e"]);
    let all: std::collections::HashSet<_> = graph.arguments().iter().map(|a| a.id).collect();
    let mut covered = std::collections::HashSet::new();
    covered.extend(lab.in_arguments());
    covered.extend(lab.out_arguments());
    covered.extend(lab.undec_arguments());
    assert_eq!(all, covered);

    for a in graph.arguments() {
        match lab.label_of(a.id).unwrap() {
            Label::In => assert!(a.minus.iter().all(|x| lab.out_arguments().contains(x))),
            Label::Out => assert!(a.minus.iter().any(|x| lab.in_arguments().contains(x))),
            Label::Undec => {
                assert!(!a.minus.iter().any(|x| lab.in_arguments().contains(x)));
                assert!(a.minus.iter().any(|x| lab.undec_arguments().contains(x)));
            }
        }
    }
}

#[test]
fn rebuilding_the_graph_twice_yields_identical_edges() {
    let (kb, mut graph, _lab) = build(&["==>a", "==>-a", "==>b", "a, b ==> c"]);
    graph.rebuild(&kb);
    let first: Vec<(usize, usize)> = graph.arguments().iter().map(|a| (a.plus.len(), a.minus.len())).collect();
    graph.rebuild(&kb);
    let second: Vec<(usize, usize)> = graph.arguments().iter().map(|a| (a.plus.len(), a.minus.len())).collect();
    assert_eq!(first, second);
}

#[test]
fn grounded_labelling_is_deterministic_across_calls() {
    let (_kb, graph, lab1) = build(&["==>a", "==>-a", "==>b", "a, b ==> c"]);
    let lab2 = Labelling::grounded(&graph);
    for a in graph.arguments() {
        assert_eq!(lab1.label_of(a.id), lab2.label_of(a.id));
        assert_eq!(lab1.step_of(a.id), lab2.step_of(a.id));
    }
}
