//! Hierarchical-alphabetical ordering of parent-linked categories.
//!
//! Roots come first, each followed depth-first by its descendants, siblings in
//! case-insensitive label order. Anything no root reaches (dangling parent,
//! parent cycle, duplicate id) is appended as an alphabetically sorted tail.
//! The sort never fails and never drops or duplicates a record.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::entities::{Category, Orphan, OrphanReason, SortedEntry};

/// Sort categories into display order, returning owned copies.
pub fn sort_hierarchically(categories: &[Category]) -> Vec<Category> {
    sort_refs(categories).into_iter().cloned().collect()
}

/// Sort categories into display order without cloning.
pub fn sort_refs(categories: &[Category]) -> Vec<&Category> {
    sort_with_depth(categories)
        .into_iter()
        .map(|entry| entry.category)
        .collect()
}

/// Sort categories and annotate each position with its depth and orphan flag.
#[instrument(level = "debug", skip(categories), fields(count = categories.len()))]
pub fn sort_with_depth(categories: &[Category]) -> Vec<SortedEntry<'_>> {
    let mut groups: HashMap<Option<&str>, Vec<usize>> = categories
        .iter()
        .enumerate()
        .map(|(idx, category)| (category.parent_id(), idx))
        .into_group_map();
    for siblings in groups.values_mut() {
        siblings.sort_by(|&a, &b| compare(categories, a, b));
    }

    let mut result = Vec::with_capacity(categories.len());
    let mut emitted = vec![false; categories.len()];
    let mut visited: HashSet<&str> = HashSet::new();

    // (index, depth); children pushed in reverse for left-to-right traversal
    let mut stack: Vec<(usize, usize)> = groups
        .get(&None)
        .map(|roots| roots.iter().rev().map(|&idx| (idx, 0)).collect())
        .unwrap_or_default();

    while let Some((idx, depth)) = stack.pop() {
        let category = &categories[idx];
        if !visited.insert(category.id()) {
            trace!(id = category.id(), "already emitted, skipping");
            continue;
        }
        emitted[idx] = true;
        result.push(SortedEntry {
            category,
            depth,
            orphan: false,
        });

        if let Some(children) = groups.get(&Some(category.id())) {
            for &child in children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    let tail: Vec<usize> = (0..categories.len())
        .filter(|&idx| !emitted[idx])
        .sorted_by(|&a, &b| compare(categories, a, b))
        .collect();
    if !tail.is_empty() {
        debug!(orphans = tail.len(), "appending orphan tail");
    }
    result.extend(tail.into_iter().map(|idx| SortedEntry {
        category: &categories[idx],
        depth: 0,
        orphan: true,
    }));

    result
}

fn compare(categories: &[Category], a: usize, b: usize) -> std::cmp::Ordering {
    categories[a]
        .cmp_label(&categories[b])
        .then_with(|| a.cmp(&b))
}

/// Explain every entry of the orphan tail.
///
/// Returns an empty list for a well-formed forest. Order follows the tail.
#[instrument(level = "debug", skip(categories), fields(count = categories.len()))]
pub fn find_orphans(categories: &[Category]) -> Vec<Orphan> {
    let entries = sort_with_depth(categories);

    let placed: HashSet<&str> = entries
        .iter()
        .filter(|entry| !entry.orphan)
        .map(|entry| entry.category.id())
        .collect();

    // First record wins for lookups, matching traversal
    let mut by_id: HashMap<&str, &Category> = HashMap::new();
    for category in categories {
        by_id.entry(category.id()).or_insert(category);
    }

    let mut links: HashMap<&str, Link<'_>> = HashMap::new();
    entries
        .iter()
        .filter(|entry| entry.orphan)
        .map(|entry| {
            let category = entry.category;
            let reason = if placed.contains(category.id()) {
                OrphanReason::DuplicateId
            } else {
                classify(category, &by_id, &mut links)
            };
            Orphan {
                id: category.id().to_string(),
                label: category.label().to_string(),
                reason,
            }
        })
        .collect()
}

/// Where an unplaced id's parent chain ends.
#[derive(Debug, Clone, Copy)]
struct Link<'a> {
    /// Ancestor a child of this id reports: the topmost record of a chain
    /// that leaves the input, or the cycle member pointing back at this id.
    upstream: &'a str,
    on_cycle: bool,
}

fn classify<'a>(
    category: &'a Category,
    by_id: &HashMap<&'a str, &'a Category>,
    links: &mut HashMap<&'a str, Link<'a>>,
) -> OrphanReason {
    let Some(parent_id) = category.parent_id() else {
        // Reached only through duplicate ids further up the chain.
        return OrphanReason::UnderOrphan {
            ancestor_id: category.id().to_string(),
        };
    };
    if parent_id == category.id() {
        return OrphanReason::Cycle;
    }
    if !by_id.contains_key(parent_id) {
        return OrphanReason::DanglingParent {
            parent_id: parent_id.to_string(),
        };
    }

    let first_record = by_id
        .get(category.id())
        .is_some_and(|&first| std::ptr::eq(first, category));
    if !first_record {
        return walk_chain(category, by_id);
    }

    resolve_links(category.id(), by_id, links);
    if links.get(category.id()).is_some_and(|link| link.on_cycle) {
        return OrphanReason::Cycle;
    }
    let ancestor_id = links
        .get(parent_id)
        .map_or(parent_id, |link| link.upstream);
    OrphanReason::UnderOrphan {
        ancestor_id: ancestor_id.to_string(),
    }
}

/// Follow parent links from `start`, recording a [`Link`] for every id on
/// the way. Stops at the first id already resolved, so each id is walked
/// once across all calls.
fn resolve_links<'a>(
    start: &'a str,
    by_id: &HashMap<&'a str, &'a Category>,
    links: &mut HashMap<&'a str, Link<'a>>,
) {
    let mut path: Vec<&'a str> = Vec::new();
    let mut on_path: HashMap<&'a str, usize> = HashMap::new();
    let mut current = start;

    let upstream = loop {
        if let Some(link) = links.get(current) {
            break link.upstream;
        }
        if let Some(&pos) = on_path.get(current) {
            let last = path[path.len() - 1];
            for i in pos..path.len() {
                let pointing_back = if i == pos { last } else { path[i - 1] };
                links.insert(
                    path[i],
                    Link {
                        upstream: pointing_back,
                        on_cycle: true,
                    },
                );
            }
            path.truncate(pos);
            break last;
        }

        on_path.insert(current, path.len());
        path.push(current);
        match by_id.get(current).and_then(|c| c.parent_id()) {
            Some(parent_id) if by_id.contains_key(parent_id) => current = parent_id,
            _ => break current,
        }
    };

    trace!(start, upstream, resolved = path.len(), "resolved parent chain");
    for id in path {
        links.entry(id).or_insert(Link {
            upstream,
            on_cycle: false,
        });
    }
}

/// Walk the parent chain of a record that shares its id with an earlier one.
fn walk_chain<'a>(category: &'a Category, by_id: &HashMap<&'a str, &'a Category>) -> OrphanReason {
    let mut seen: HashSet<&str> = HashSet::new();
    seen.insert(category.id());
    let mut current = category;

    loop {
        let Some(parent_id) = current.parent_id() else {
            return OrphanReason::UnderOrphan {
                ancestor_id: current.id().to_string(),
            };
        };
        if parent_id == category.id() {
            return OrphanReason::Cycle;
        }
        if !seen.insert(parent_id) {
            return OrphanReason::UnderOrphan {
                ancestor_id: current.id().to_string(),
            };
        }
        match by_id.get(parent_id) {
            Some(&parent) => current = parent,
            None => {
                return OrphanReason::UnderOrphan {
                    ancestor_id: current.id().to_string(),
                }
            }
        }
    }
}
