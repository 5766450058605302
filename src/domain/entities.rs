//! Domain entities: core data structures

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value};

/// A catalog category with an optional parent link.
///
/// The display label is resolved once at construction: `display_name` when it
/// is non-blank, otherwise `name`. Comparators only ever look at the cached
/// label and its case-folded sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    id: String,
    parent_id: Option<String>,
    name: String,
    display_name: Option<String>,
    /// Fields carried through from the input record (slug, description, ...)
    extra: Map<String, Value>,
    label: String,
    sort_key: String,
}

impl Category {
    /// Create a category. An empty `parent_id` is treated as a root.
    pub fn new(
        id: impl Into<String>,
        parent_id: Option<&str>,
        name: impl Into<String>,
    ) -> Self {
        let parent_id = parent_id
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string);
        let mut category = Self {
            id: id.into(),
            parent_id,
            name: name.into(),
            display_name: None,
            extra: Map::new(),
            label: String::new(),
            sort_key: String::new(),
        };
        category.resolve_label();
        category
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self.resolve_label();
        self
    }

    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    fn resolve_label(&mut self) {
        self.label = match self.display_name.as_deref() {
            Some(display) if !display.trim().is_empty() => display.to_string(),
            _ => self.name.clone(),
        };
        self.sort_key = self.label.to_lowercase();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Human-readable label used for ordering and rendering.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Sibling order: case-folded label, then raw label, then id.
    ///
    /// Empty labels come first since the empty string is the smallest key.
    pub fn cmp_label(&self, other: &Self) -> Ordering {
        self.sort_key
            .cmp(&other.sort_key)
            .then_with(|| self.label.cmp(&other.label))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Case-insensitive substring match on label, name and id.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.sort_key.contains(needle_lowercase)
            || self.name.to_lowercase().contains(needle_lowercase)
            || self.id.to_lowercase().contains(needle_lowercase)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// One position in the hierarchical ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortedEntry<'a> {
    pub category: &'a Category,
    /// 0 for roots and for everything in the orphan tail
    pub depth: usize,
    /// True when the category was not reachable from any root
    pub orphan: bool,
}

/// Why a category ended up in the orphan tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanReason {
    /// The referenced parent is not part of the input
    DanglingParent { parent_id: String },
    /// The category sits on a parent cycle (self-parent included)
    Cycle,
    /// An ancestor is dangling or cyclic, so no root reaches this category
    UnderOrphan { ancestor_id: String },
    /// Another record with the same id was already placed in the tree
    DuplicateId,
}

impl fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrphanReason::DanglingParent { parent_id } => {
                write!(f, "parent '{}' not found", parent_id)
            }
            OrphanReason::Cycle => write!(f, "parent cycle"),
            OrphanReason::UnderOrphan { ancestor_id } => {
                write!(f, "ancestor '{}' is unreachable", ancestor_id)
            }
            OrphanReason::DuplicateId => write!(f, "duplicate id"),
        }
    }
}

/// Diagnostic record for a category placed in the orphan tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub id: String,
    pub label: String,
    pub reason: OrphanReason,
}
