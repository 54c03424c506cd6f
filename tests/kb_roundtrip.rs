//! Save/load round-trip and batch-loading behaviour of the rule-file format
//! (spec §6), driven entirely through the public `KnowledgeBase` API.

use akh_argue::kb::KnowledgeBase;

fn write_temp(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.kb");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn save_then_load_reproduces_the_user_rule_set() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule_str("S1: a, b --> c").unwrap();
    kb.add_rule_str("D1: p, q =(x, y)=> r").unwrap();
    kb.add_rule_str("p ==> q").unwrap();
    let errors = kb.load_file("D1 < S1\n").unwrap();
    assert!(errors.is_empty());

    let saved = kb.save_to_string();
    let (_dir, path) = write_temp(&saved);
    let text = std::fs::read_to_string(&path).unwrap();

    let mut kb2 = KnowledgeBase::new();
    let errors = kb2.load_file(&text).unwrap();
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");

    assert_eq!(kb.user_rules().count(), kb2.user_rules().count());
    assert!(kb2.more_preferred("S1", "D1"));
    assert!(!kb2.more_preferred("D1", "S1"));
}

#[test]
fn rule_file_format_from_spec_example_loads_cleanly() {
    let text = "\
# comments start at '#'
S1: a, b --> c                 # strict rule
D1: p, q =(x, y)=> r           # defeasible with vulnerabilities x, y
    p ==> q                    # defeasible, no name
R1 < R2, R3 < R4               # preference ordering
";
    let mut kb = KnowledgeBase::new();
    let errors = kb.load_file(text).unwrap();
    assert!(errors.is_empty(), "unexpected parse errors: {errors:?}");
    assert_eq!(kb.user_rules().count(), 3);
    assert!(kb.more_preferred("R2", "R1"));
    assert!(kb.more_preferred("R4", "R3"));
    assert!(kb.more_preferred("R4", "R2"));
}

#[test]
fn batch_mode_defers_reconstruction_until_recalculate() {
    let (_dir, path) = write_temp("-->a\na ==> b\n");
    let text = std::fs::read_to_string(&path).unwrap();

    let mut kb = KnowledgeBase::new();
    kb.set_batch(true);
    let errors = kb.load_file(&text).unwrap();
    assert!(errors.is_empty());
    // load_file always recalculates once at the end regardless of the
    // caller's batch flag, restoring it afterward.
    assert!(kb.is_batch());
    assert_eq!(kb.proofs().count(), 2);
}

#[test]
fn reloading_a_saved_kb_does_not_persist_proof_names_but_proof_count_matches() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule_str("-->a").unwrap();
    kb.add_rule_str("a ==> b").unwrap();
    let before = kb.proofs().count();

    let saved = kb.save_to_string();
    let mut kb2 = KnowledgeBase::new();
    kb2.load_file(&saved).unwrap();
    assert_eq!(kb2.proofs().count(), before);
}
