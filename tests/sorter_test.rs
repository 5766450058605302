//! Tests for hierarchical-alphabetical category ordering

use std::collections::HashSet;

use rstest::rstest;

use cattree::domain::{
    find_orphans, sort_hierarchically, sort_refs, sort_with_depth, Category, OrphanReason,
};
use cattree::util::testing;

fn cat(id: &str, parent: Option<&str>, name: &str) -> Category {
    Category::new(id, parent, name)
}

fn labels(categories: &[Category]) -> Vec<String> {
    sort_refs(categories)
        .iter()
        .map(|c| c.label().to_string())
        .collect()
}

fn position(sorted: &[Category], id: &str) -> usize {
    sorted.iter().position(|c| c.id() == id).unwrap()
}

/// Small deterministic generator so property checks stay reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % bound
    }
}

fn random_listing(seed: u64, size: usize) -> Vec<Category> {
    let mut rng = Lcg(seed);
    let words = ["alpha", "Beta", "gamma", "Delta", "", "beta", "Zulu", "echo"];
    (0..size)
        .map(|i| {
            let parent = match rng.next(4) {
                0 => None,
                1 => Some(format!("missing-{}", rng.next(3))),
                _ => Some(rng.next(size as u64).to_string()),
            };
            let name = words[rng.next(words.len() as u64) as usize];
            Category::new(i.to_string(), parent.as_deref(), name)
        })
        .collect()
}

// ============================================================
// Example scenarios
// ============================================================

#[test]
fn given_child_before_parent_when_sorting_then_parent_precedes_child() {
    testing::init_test_setup();
    let input = vec![
        cat("2", Some("1"), "Laptops"),
        cat("1", None, "Electronics"),
    ];

    assert_eq!(labels(&input), vec!["Electronics", "Laptops"]);
}

#[test]
fn given_unsorted_siblings_when_sorting_then_orders_alphabetically() {
    let input = vec![
        cat("root", None, "Root"),
        cat("z", Some("root"), "Zeta"),
        cat("a", Some("root"), "Alpha"),
        cat("m", Some("root"), "Mid"),
    ];

    assert_eq!(labels(&input), vec!["Root", "Alpha", "Mid", "Zeta"]);
}

#[test]
fn given_two_node_cycle_when_sorting_then_both_appear_once_in_tail() {
    let input = vec![cat("x", Some("y"), "X"), cat("y", Some("x"), "Y")];

    let entries = sort_with_depth(&input);

    let names: Vec<&str> = entries.iter().map(|e| e.category.label()).collect();
    assert_eq!(names, vec!["X", "Y"]);
    assert!(entries.iter().all(|e| e.orphan));
}

#[test]
fn given_empty_input_when_sorting_then_returns_empty() {
    assert!(sort_hierarchically(&[]).is_empty());
    assert!(find_orphans(&[]).is_empty());
}

#[test]
fn given_dangling_parent_when_sorting_then_category_kept_in_tail() {
    let input = vec![cat("a", Some("missing-id"), "Lonely")];

    let entries = sort_with_depth(&input);

    assert_eq!(entries.len(), 1);
    assert!(entries[0].orphan);
    assert_eq!(entries[0].category.id(), "a");
}

// ============================================================
// Ordering rules
// ============================================================

#[test]
fn given_nested_forest_when_sorting_then_emits_depth_first() {
    let input = vec![
        cat("phones", Some("elec"), "Phones"),
        cat("books", None, "Books"),
        cat("gaming", Some("laptops"), "Gaming"),
        cat("elec", None, "Electronics"),
        cat("laptops", Some("elec"), "Laptops"),
        cat("fiction", Some("books"), "Fiction"),
    ];

    assert_eq!(
        labels(&input),
        vec!["Books", "Fiction", "Electronics", "Laptops", "Gaming", "Phones"]
    );

    let depths: Vec<usize> = sort_with_depth(&input).iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 0, 1, 2, 1]);
}

#[rstest]
#[case(vec!["banana", "Apple", "cherry"], vec!["Apple", "banana", "cherry"])]
#[case(vec!["b", "B", "a"], vec!["a", "B", "b"])]
#[case(vec!["Zed", "", "alpha"], vec!["", "alpha", "Zed"])]
#[case(vec!["Éclair", "eclair", "Apple"], vec!["Apple", "eclair", "Éclair"])]
fn given_root_labels_when_sorting_then_case_insensitive_order(
    #[case] names: Vec<&str>,
    #[case] expected: Vec<&str>,
) {
    let input: Vec<Category> = names
        .iter()
        .enumerate()
        .map(|(i, name)| cat(&i.to_string(), None, name))
        .collect();

    assert_eq!(labels(&input), expected);
}

#[test]
fn given_display_name_when_sorting_then_uses_it_over_name() {
    let input = vec![
        cat("1", None, "aaa").with_display_name("Zoo"),
        cat("2", None, "mmm"),
        cat("3", None, "Beach").with_display_name(""),
    ];

    assert_eq!(labels(&input), vec!["Beach", "mmm", "Zoo"]);
}

#[test]
fn given_blank_display_name_when_resolving_label_then_falls_back_to_name() {
    let category = cat("1", None, "Garden").with_display_name("   ");
    assert_eq!(category.label(), "Garden");
}

#[test]
fn given_empty_parent_id_when_constructing_then_treated_as_root() {
    let category = cat("1", Some(""), "Garden");
    assert!(category.is_root());
    assert_eq!(labels(&[category]), vec!["Garden"]);
}

#[test]
fn given_roots_and_orphans_when_sorting_then_orphans_come_last_sorted() {
    let input = vec![
        cat("o2", Some("nope"), "Aardvark"),
        cat("r", None, "Zebra"),
        cat("o1", Some("gone"), "Moose"),
    ];

    assert_eq!(labels(&input), vec!["Zebra", "Aardvark", "Moose"]);
}

#[test]
fn given_self_parent_when_sorting_then_lands_in_tail_once() {
    let input = vec![cat("a", Some("a"), "Self"), cat("b", None, "Root")];

    let entries = sort_with_depth(&input);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].category.id(), "b");
    assert!(entries[1].orphan);
}

#[test]
fn given_duplicate_ids_when_sorting_then_keeps_both_records() {
    let input = vec![
        cat("a", None, "First"),
        cat("a", None, "Second"),
        cat("c", Some("a"), "Child"),
    ];

    let entries = sort_with_depth(&input);

    let names: Vec<&str> = entries.iter().map(|e| e.category.label()).collect();
    assert_eq!(names, vec!["First", "Child", "Second"]);
    assert!(entries[2].orphan);

    let orphans = find_orphans(&input);
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].reason, OrphanReason::DuplicateId);
}

#[test]
fn given_owned_sort_when_comparing_with_refs_then_same_order() {
    let input = random_listing(7, 40);
    let owned: Vec<String> = sort_hierarchically(&input)
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    let borrowed: Vec<String> = sort_refs(&input)
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    assert_eq!(owned, borrowed);
}

// ============================================================
// Orphan diagnostics
// ============================================================

#[test]
fn given_malformed_hierarchy_when_finding_orphans_then_reports_causes() {
    let input = vec![
        cat("root", None, "Root"),
        cat("ok", Some("root"), "Fine"),
        cat("d", Some("ghost"), "Dangling"),
        cat("dc", Some("d"), "Dangling Child"),
        cat("x", Some("y"), "Cycle X"),
        cat("y", Some("x"), "Cycle Y"),
    ];

    let orphans = find_orphans(&input);

    let reason = |id: &str| {
        orphans
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.reason.clone())
            .unwrap()
    };
    assert_eq!(orphans.len(), 4);
    assert_eq!(
        reason("d"),
        OrphanReason::DanglingParent {
            parent_id: "ghost".to_string()
        }
    );
    assert_eq!(
        reason("dc"),
        OrphanReason::UnderOrphan {
            ancestor_id: "d".to_string()
        }
    );
    assert_eq!(reason("x"), OrphanReason::Cycle);
    assert_eq!(reason("y"), OrphanReason::Cycle);

    // Order follows the alphabetical tail
    let ids: Vec<&str> = orphans.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, vec!["x", "y", "d", "dc"]);
}

#[test]
fn given_long_chain_under_dangling_root_when_finding_orphans_then_all_point_at_top() {
    let len = 5_000;
    let input: Vec<Category> = (0..len)
        .map(|i| {
            let parent = if i == 0 {
                "ghost".to_string()
            } else {
                (i - 1).to_string()
            };
            cat(&i.to_string(), Some(&parent), &format!("Node {i}"))
        })
        .collect();

    let orphans = find_orphans(&input);

    assert_eq!(orphans.len(), len);
    for orphan in &orphans {
        let expected = if orphan.id == "0" {
            OrphanReason::DanglingParent {
                parent_id: "ghost".to_string(),
            }
        } else {
            OrphanReason::UnderOrphan {
                ancestor_id: "0".to_string(),
            }
        };
        assert_eq!(orphan.reason, expected, "orphan {}", orphan.id);
    }
}

#[test]
fn given_long_chain_into_cycle_when_finding_orphans_then_reports_cycle_entry() {
    // c0 <-> c1 form a cycle, n0 hangs off c0 and n(i) off n(i-1)
    let len = 3_000;
    let mut input = vec![cat("c0", Some("c1"), "Cycle 0"), cat("c1", Some("c0"), "Cycle 1")];
    input.extend((0..len).map(|i| {
        let parent = if i == 0 {
            "c0".to_string()
        } else {
            format!("n{}", i - 1)
        };
        cat(&format!("n{i}"), Some(&parent), &format!("Node {i}"))
    }));

    let orphans = find_orphans(&input);

    assert_eq!(orphans.len(), len + 2);
    for orphan in &orphans {
        let expected = if orphan.id.starts_with('c') {
            OrphanReason::Cycle
        } else {
            OrphanReason::UnderOrphan {
                ancestor_id: "c1".to_string(),
            }
        };
        assert_eq!(orphan.reason, expected, "orphan {}", orphan.id);
    }
}

#[test]
fn given_cycle_entered_from_two_sides_when_finding_orphans_then_ancestor_closes_each_walk() {
    let input = vec![
        cat("x", Some("y"), "X"),
        cat("y", Some("x"), "Y"),
        cat("from_x", Some("x"), "From X"),
        cat("from_y", Some("y"), "From Y"),
    ];

    let orphans = find_orphans(&input);

    let reason = |id: &str| orphans.iter().find(|o| o.id == id).unwrap().reason.clone();
    assert_eq!(
        reason("from_x"),
        OrphanReason::UnderOrphan {
            ancestor_id: "y".to_string()
        }
    );
    assert_eq!(
        reason("from_y"),
        OrphanReason::UnderOrphan {
            ancestor_id: "x".to_string()
        }
    );
}

#[test]
fn given_well_formed_forest_when_finding_orphans_then_empty() {
    let input = vec![
        cat("1", None, "A"),
        cat("2", Some("1"), "B"),
        cat("3", Some("2"), "C"),
    ];
    assert!(find_orphans(&input).is_empty());
}

// ============================================================
// Properties over generated listings
// ============================================================

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(3, 10)]
#[case(4, 50)]
#[case(5, 200)]
fn given_generated_listing_when_sorting_then_output_is_permutation(
    #[case] seed: u64,
    #[case] size: usize,
) {
    let input = random_listing(seed, size);

    let sorted = sort_hierarchically(&input);

    assert_eq!(sorted.len(), input.len());
    let mut expected: Vec<String> = input.iter().map(|c| c.id().to_string()).collect();
    let mut actual: Vec<String> = sorted.iter().map(|c| c.id().to_string()).collect();
    expected.sort();
    actual.sort();
    assert_eq!(expected, actual);
    // Generated ids are unique
    let unique: HashSet<&str> = sorted.iter().map(|c| c.id()).collect();
    assert_eq!(unique.len(), size);
}

#[rstest]
#[case(11, 30)]
#[case(12, 80)]
#[case(13, 150)]
fn given_generated_listing_when_sorting_then_placed_parents_precede_children(
    #[case] seed: u64,
    #[case] size: usize,
) {
    let input = random_listing(seed, size);

    let entries = sort_with_depth(&input);
    let sorted: Vec<Category> = entries.iter().map(|e| e.category.clone()).collect();

    for entry in entries.iter().filter(|e| !e.orphan) {
        if let Some(parent_id) = entry.category.parent_id() {
            assert!(position(&sorted, parent_id) < position(&sorted, entry.category.id()));
        }
    }
}

#[rstest]
#[case(21, 60)]
#[case(22, 120)]
fn given_generated_listing_when_sorting_then_siblings_ascend(
    #[case] seed: u64,
    #[case] size: usize,
) {
    let input = random_listing(seed, size);

    let entries = sort_with_depth(&input);

    for (i, a) in entries.iter().enumerate() {
        for b in entries.iter().skip(i + 1) {
            let siblings = !a.orphan && !b.orphan && a.category.parent_id() == b.category.parent_id();
            if siblings {
                assert!(
                    a.category.label().to_lowercase() <= b.category.label().to_lowercase(),
                    "{} should not precede {}",
                    a.category.label(),
                    b.category.label()
                );
            }
        }
    }
}

#[rstest]
#[case(31, 25)]
#[case(32, 100)]
fn given_sorted_output_when_sorting_again_then_order_is_unchanged(
    #[case] seed: u64,
    #[case] size: usize,
) {
    let once = sort_hierarchically(&random_listing(seed, size));
    let twice = sort_hierarchically(&once);
    assert_eq!(once, twice);
}

#[test]
fn given_deep_chain_when_sorting_then_does_not_overflow() {
    let depth = 50_000;
    let mut input: Vec<Category> = (1..depth)
        .map(|i| cat(&i.to_string(), Some(&(i - 1).to_string()), "node"))
        .collect();
    input.push(cat("0", None, "root"));

    let entries = sort_with_depth(&input);

    assert_eq!(entries.len(), depth);
    assert_eq!(entries[0].category.id(), "0");
    assert_eq!(entries[depth - 1].depth, depth - 1);
}
