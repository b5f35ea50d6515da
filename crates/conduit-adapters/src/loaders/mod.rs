//! Document loaders.
//!
//! - [`notion`] -- a directory of markdown files, such as a Notion export.

pub mod notion;
