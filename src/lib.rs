//! Hierarchical ordering of flat, parent-linked category listings.
//!
//! ```
//! use cattree::domain::{sort_hierarchically, Category};
//!
//! let categories = vec![
//!     Category::new("2", Some("1"), "Laptops"),
//!     Category::new("1", None, "Electronics"),
//! ];
//! let sorted = sort_hierarchically(&categories);
//! assert_eq!(sorted[0].label(), "Electronics");
//! assert_eq!(sorted[1].label(), "Laptops");
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{sort_hierarchically, sort_refs, Category};
