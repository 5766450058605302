//! Case-insensitive filtering of a category listing.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument};

use crate::domain::entities::Category;

/// Keep categories whose label, name or id contains `query`.
///
/// The query is trimmed and compared case-insensitively; an empty query keeps
/// everything. With `keep_ancestors` the parent chain of every match is kept
/// too, so matches stay attached to their roots after re-sorting. Input order
/// is preserved.
#[instrument(level = "debug", skip(categories), fields(count = categories.len()))]
pub fn filter_by_query(
    categories: &[Category],
    query: &str,
    keep_ancestors: bool,
) -> Vec<Category> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return categories.to_vec();
    }

    let matched: Vec<bool> = categories.iter().map(|c| c.matches(&needle)).collect();

    let mut ancestors: HashSet<&str> = HashSet::new();
    if keep_ancestors {
        let mut by_id: HashMap<&str, &Category> = HashMap::new();
        for category in categories {
            by_id.entry(category.id()).or_insert(category);
        }

        for (category, _) in categories.iter().zip(&matched).filter(|(_, &m)| m) {
            let mut parent_id = category.parent_id();
            // Stops on dangling parents and on cycles
            while let Some(id) = parent_id {
                if !ancestors.insert(id) {
                    break;
                }
                parent_id = by_id.get(id).and_then(|parent| parent.parent_id());
            }
        }
    }

    let result: Vec<Category> = categories
        .iter()
        .zip(&matched)
        .filter(|(category, &m)| m || ancestors.contains(category.id()))
        .map(|(category, _)| category.clone())
        .collect();
    debug!(query = %needle, kept = result.len(), "filtered categories");
    result
}
