//! tagdoc - Tagged comment documentation tool
//!
//! Extracts `#TAG` comment blocks (such as `#EDU` and `#NOTE`) from source
//! files, renders them as categorized markdown documentation, and strips
//! selected tags from source to produce production copies.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TagdocError;
