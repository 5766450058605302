//! Category catalog service
//!
//! Loads category documents, orders them hierarchically and renders the result.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::records::parse_document;
use crate::application::render::{render, OutputFormat, RenderOptions};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{filter_by_query, find_orphans, sort_hierarchically, Category, Orphan};
use crate::infrastructure::traits::FileSystem;

/// Service for loading and ordering category listings.
pub struct CatalogService {
    fs: Arc<dyn FileSystem>,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a category document from disk.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Vec<Category>> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::InputNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read categories", path)?;
        self.parse(&content, &path.display().to_string())
    }

    /// Parse a category document held in memory (e.g. read from stdin).
    pub fn parse(&self, content: &str, source_name: &str) -> ApplicationResult<Vec<Category>> {
        let categories = parse_document(content, source_name)?;
        debug!("load: {} categories from {}", categories.len(), source_name);
        Ok(categories)
    }

    /// Hierarchical-alphabetical order of the whole listing.
    pub fn sorted(&self, categories: &[Category]) -> Vec<Category> {
        sort_hierarchically(categories)
    }

    /// Filter by query, then re-sort what is left.
    #[instrument(level = "debug", skip(self, categories))]
    pub fn search(
        &self,
        categories: &[Category],
        query: &str,
        keep_ancestors: bool,
    ) -> Vec<Category> {
        let filtered = filter_by_query(categories, query, keep_ancestors);
        sort_hierarchically(&filtered)
    }

    /// Diagnostics for everything that landed in the orphan tail.
    pub fn orphans(&self, categories: &[Category]) -> Vec<Orphan> {
        find_orphans(categories)
    }

    /// Render categories in the given format.
    pub fn render(
        &self,
        categories: &[Category],
        format: OutputFormat,
        options: &RenderOptions,
    ) -> ApplicationResult<String> {
        render(categories, format, options)
    }

    /// Write rendered output to a file, creating parent directories.
    #[instrument(level = "debug", skip(self, content))]
    pub fn write(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        let mut content = content.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }
        self.fs
            .write(path, &content)
            .with_path_context("write output", path)
    }
}
