//! Tests for GenealogyStore: identifier tree and family relation

use rstest::{fixture, rstest};

use lineage::domain::{DomainError, GenealogyStore, Index, Person};
use lineage::util::testing;

fn person(id: i64, name: &str) -> Person {
    Person::new(id, name, "1970-01-01", "X").expect("valid person")
}

fn pairs<'a>(iter: impl Iterator<Item = (Index, &'a Person)>) -> Vec<(String, i64)> {
    iter.map(|(_, p)| (p.name().to_string(), p.id())).collect()
}

fn ids<'a>(iter: impl Iterator<Item = (Index, &'a Person)>) -> Vec<i64> {
    iter.map(|(_, p)| p.id()).collect()
}

/// Ana(1), Luis(2) child of 1, Eva(3) child of 1.
#[fixture]
fn ana_family() -> (GenealogyStore, Index, Index, Index) {
    testing::init_test_setup();
    let mut store = GenealogyStore::new();
    let ana = store.insert(person(1, "Ana")).unwrap();
    let luis = store.insert(person(2, "Luis")).unwrap();
    store.add_child(ana, luis).unwrap();
    let eva = store.insert(person(3, "Eva")).unwrap();
    store.add_child(ana, eva).unwrap();
    (store, ana, luis, eva)
}

// ============================================================
// Scenario
// ============================================================

#[rstest]
fn given_ana_family_when_traversing_inorder_then_ascending(
    ana_family: (GenealogyStore, Index, Index, Index),
) {
    let (store, _, _, _) = ana_family;
    assert_eq!(
        pairs(store.inorder()),
        vec![
            ("Ana".to_string(), 1),
            ("Luis".to_string(), 2),
            ("Eva".to_string(), 3)
        ]
    );
}

#[rstest]
fn given_ana_family_when_listing_descendants_then_link_order(
    ana_family: (GenealogyStore, Index, Index, Index),
) {
    let (store, ana, _, _) = ana_family;
    assert_eq!(ids(store.descendants(ana)), vec![2, 3]);
}

#[rstest]
fn given_ana_family_when_listing_ancestors_then_genealogical_not_bst_parent(
    ana_family: (GenealogyStore, Index, Index, Index),
) {
    let (store, ana, luis, eva) = ana_family;
    // Eva hangs right of Luis in the identifier tree
    assert_eq!(store.bst_parent(eva), Some(luis));
    assert_eq!(pairs(store.ancestors(eva)), vec![("Ana".to_string(), 1)]);
    assert_eq!(store.ancestors(ana).count(), 0);
}

// ============================================================
// Insertion and lookup
// ============================================================

#[rstest]
#[case(vec![5, 3, 8, 1, 4, 7, 9])]
#[case(vec![1, 2, 3, 4, 5])]
#[case(vec![5, 4, 3, 2, 1])]
#[case(vec![10, 0, 20, 15, 5, 25, 12])]
fn given_distinct_ids_when_inserting_then_inorder_sorted_and_all_found(#[case] input: Vec<i64>) {
    let mut store = GenealogyStore::new();
    let handles: Vec<(i64, Index)> = input
        .iter()
        .map(|&id| (id, store.insert(person(id, "P")).unwrap()))
        .collect();

    let mut expected = input.clone();
    expected.sort();
    assert_eq!(ids(store.inorder()), expected);

    for (id, idx) in handles {
        assert_eq!(store.find_by_id(id), Some(idx));
    }
    assert_eq!(store.find_by_id(1_000), None);
    assert_eq!(store.find_by_id(-1), None);
}

#[rstest]
fn given_empty_store_when_searching_then_absent() {
    let store = GenealogyStore::new();
    assert_eq!(store.find_by_id(0), None);
    assert_eq!(store.find_by_name("Ana"), None);
    assert_eq!(store.preorder().count(), 0);
    assert_eq!(store.inorder().count(), 0);
    assert_eq!(store.postorder().count(), 0);
}

#[rstest]
fn given_duplicate_id_when_inserting_then_rejected() {
    let mut store = GenealogyStore::new();
    store.insert(person(4, "Four")).unwrap();

    let result = store.insert(person(4, "Again"));

    assert_eq!(result, Err(DomainError::DuplicateIdentifier(4)));
    assert_eq!(store.len(), 1);
}

#[rstest]
fn given_duplicate_names_when_searching_by_name_then_first_in_preorder() {
    let mut store = GenealogyStore::new();
    store.insert(person(5, "Root")).unwrap();
    // Inserted first, but sits in the right subtree
    let right = store.insert(person(8, "Maria")).unwrap();
    let left = store.insert(person(2, "Maria")).unwrap();

    assert_eq!(store.find_by_name("Maria"), Some(left));
    assert_ne!(store.find_by_name("Maria"), Some(right));
    assert_eq!(store.find_by_name("maria"), None);
}

// ============================================================
// Family relation
// ============================================================

#[rstest]
fn given_links_when_querying_then_descendants_and_ancestors_are_inverse() {
    let mut store = GenealogyStore::new();
    let handles: Vec<Index> = [50, 20, 70, 10, 30, 60, 80]
        .into_iter()
        .map(|id| store.insert(person(id, "P")).unwrap())
        .collect();
    // 50 -> 80 -> 10 -> 30, 50 -> 20, 80 -> 60
    let links = [(0, 6), (6, 3), (3, 4), (0, 1), (6, 5)];
    for (p, c) in links {
        store.add_child(handles[p], handles[c]).unwrap();
        assert!(store.descendants(handles[p]).any(|(idx, _)| idx == handles[c]));
        assert!(store.ancestors(handles[c]).any(|(idx, _)| idx == handles[p]));
    }

    for &p in &handles {
        for (d, _) in store.descendants(p) {
            assert!(store.ancestors(d).any(|(idx, _)| idx == p));
        }
        for (a, _) in store.ancestors(p) {
            assert!(store.descendants(a).any(|(idx, _)| idx == p));
        }
    }

    assert_eq!(ids(store.descendants(handles[0])), vec![80, 10, 30, 60, 20]);
    assert_eq!(ids(store.ancestors(handles[4])), vec![10, 80, 50]);
}

#[rstest]
fn given_chain_when_linking_back_then_cycle_detected() {
    let mut store = GenealogyStore::new();
    let a = store.insert(person(1, "A")).unwrap();
    let b = store.insert(person(2, "B")).unwrap();
    let c = store.insert(person(3, "C")).unwrap();
    store.add_child(a, b).unwrap();
    store.add_child(b, c).unwrap();

    let result = store.add_child(c, a);

    assert_eq!(result, Err(DomainError::CycleDetected { parent: 3, child: 1 }));
    assert_eq!(ids(store.descendants(c)), Vec::<i64>::new());
}

#[rstest]
fn given_no_mutation_when_traversing_twice_then_identical(
    ana_family: (GenealogyStore, Index, Index, Index),
) {
    let (store, ana, _, eva) = ana_family;
    assert_eq!(ids(store.preorder()), ids(store.preorder()));
    assert_eq!(ids(store.inorder()), ids(store.inorder()));
    assert_eq!(ids(store.postorder()), ids(store.postorder()));
    assert_eq!(ids(store.ancestors(eva)), ids(store.ancestors(eva)));
    assert_eq!(ids(store.descendants(ana)), ids(store.descendants(ana)));
}
