//! Tests for the interactive menu, driven through in-memory input

use std::io::Cursor;

use lineage::cli::Session;
use lineage::config::Settings;
use lineage::domain::TraversalOrder;
use lineage::util::testing;

type TestSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

fn settings() -> Settings {
    Settings {
        color: false,
        ..Settings::default()
    }
}

/// Run a session over `script` and return it with its rendered output.
fn run_with(script: &str, settings: Settings) -> (TestSession, String) {
    testing::init_test_setup();
    let mut session = Session::new(Cursor::new(script.as_bytes().to_vec()), Vec::new(), settings);
    session.run().expect("session runs");
    let output = String::from_utf8(session.output().clone()).expect("utf8 output");
    (session, output)
}

fn run(script: &str) -> (TestSession, String) {
    run_with(script, settings())
}

/// Menu answers inserting Ana(1), Luis(2) and Eva(3), both children of Ana.
const ANA_FAMILY: &str = "\
1\n1\nAna\n1950-02-03\nF\n\n\
1\n2\nLuis\n1975-06-07\nM\n1\n\
1\n3\nEva\n1978-08-09\nF\n1\n";

#[test]
fn given_ana_family_when_inserting_through_menu_then_store_is_populated() {
    let (session, output) = run(ANA_FAMILY);

    let ids: Vec<i64> = session
        .service()
        .traverse(TraversalOrder::Inorder)
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert!(output.contains("Added Ana (1)"));
    assert!(output.contains("Added Eva (3)"));
    assert!(output.contains("child of 1"));
}

#[test]
fn given_ana_family_when_listing_relations_then_prints_genealogy() {
    let script = format!("{ANA_FAMILY}8\n3\n9\n1\n6\n0\n");

    let (_, output) = run(&script);

    assert!(output.contains("Ancestors of 3:"));
    assert!(output.contains("  Ana (1)\n"));
    assert!(output.contains("Descendants of 1:"));
    assert!(output.contains("  Luis (2)\n  Eva (3)\n"));
    assert!(output.contains("inorder:"));
    assert!(output.contains("  Ana (1)\n  Luis (2)\n  Eva (3)\n"));
    assert!(output.trim_end().ends_with("Bye"));
}

#[test]
fn given_invalid_and_duplicate_ids_when_inserting_then_reprompts() {
    // "x" and "-4" are rejected, 1 is taken, 2 is accepted
    let script = "1\n1\nAna\n1950\nF\n\n1\nx\n-4\n1\n2\nLuis\n1975\nM\n\n";

    let (session, output) = run(script);

    assert!(output.contains("invalid input 'x': not an integer"));
    assert!(output.contains("invalid identifier: -4"));
    assert!(output.contains("identifier already present: 1"));
    assert!(session.service().find_by_id(2).is_some());
}

#[test]
fn given_blank_fields_when_inserting_then_reprompts_until_given() {
    let script = "1\n7\n\n  \nZoe\n\n2001\n\nF\n\n";

    let (session, output) = run(script);

    assert_eq!(output.matches("missing required field: name").count(), 2);
    assert_eq!(output.matches("missing required field: birth date").count(), 1);
    assert_eq!(output.matches("missing required field: gender").count(), 1);
    let zoe = session.service().find_by_id(7).expect("inserted");
    assert_eq!(zoe.name(), "Zoe");
    assert_eq!(zoe.birth_date(), "2001");
}

#[test]
fn given_unknown_parent_when_inserting_then_warns_and_keeps_person() {
    let (session, output) = run("1\n1\nAna\n1950\nF\n99\n");

    assert!(output.contains("parent 99 not found, added without parent"));
    assert!(session.service().find_by_id(1).is_some());
}

#[test]
fn given_own_id_as_parent_when_inserting_then_reports_cycle_and_stores_nothing() {
    let (session, output) = run("1\n5\nAna\n1950\nF\n5\n6\n");

    assert!(output.contains("cycle detected: 5 is already an ancestor of 5"));
    assert!(!output.contains("Added Ana (5)"));
    assert!(session.service().find_by_id(5).is_none());
    assert!(output.contains("inorder:"));
    assert!(output.contains("(empty)"));
}

#[test]
fn given_cycle_when_assigning_parent_then_reports_error() {
    let script = format!("{ANA_FAMILY}2\n3\n1\n2\n2\n3\n9\n2\n");

    let (session, output) = run(&script);

    assert!(output.contains("cycle detected: 1 is already an ancestor of 3"));
    assert!(output.contains("3 is now a child of 2"));
    let ancestors: Vec<i64> = session
        .service()
        .ancestors_of(3)
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ancestors, vec![2, 1]);
}

#[test]
fn given_lookups_when_searching_then_prints_details_or_warning() {
    let script = format!("{ANA_FAMILY}3\n2\n3\n42\n4\nEva\n4\nNobody\n");

    let (_, output) = run(&script);

    assert!(output.contains("birth date: 1975-06-07"));
    assert!(output.contains("no person with id 42"));
    assert!(output.contains("gender: F"));
    assert!(output.contains("no person named 'Nobody'"));
}

#[test]
fn given_settings_when_rendering_chain_then_uses_separator_and_hides_ids() {
    let script = "1\n1\nAna\n1950\nF\n\n1\n2\nLuis\n1975\nM\n1\n1\n3\nEva\n2000\nF\n2\n8\n3\n";
    let settings = Settings {
        show_ids: false,
        chain_separator: " / ".into(),
        ..settings()
    };

    let (_, output) = run_with(script, settings);

    assert!(output.contains("  Luis / Ana\n"));
    assert!(output.contains("Added Eva\n"));
}

#[test]
fn given_family_when_showing_tree_then_renders_forest() {
    let script = format!("{ANA_FAMILY}10\n\n10\n3\n10\n99\n");

    let (_, output) = run(&script);

    assert!(output.contains("Ana (1)\n├── Luis (2)\n└── Eva (3)\n"));
    assert!(output.contains("no person with id 99"));
}

#[test]
fn given_unknown_option_when_choosing_then_reports_and_continues() {
    let (_, output) = run("42\n5\n");

    assert!(output.contains("unknown option '42'"));
    assert!(output.contains("preorder:"));
    assert!(output.contains("(empty)"));
}
