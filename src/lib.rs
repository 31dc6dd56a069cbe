//! Core library for tydoc, turning an analyzed symbol graph into a linked
//! documentation model.
//!
//! The crate consumes a [`reflect::Project`] produced by an external
//! static-analysis front end and builds pages, source-like excerpts,
//! structured doc comments and a fully resolved cross-reference graph. It is
//! renderer-agnostic: the output model serializes cleanly and carries
//! everything a site generator needs (pathnames, anchors, tables of
//! contents, hyperlink spans).

/// Structured doc-comment model.
pub mod docs;

/// Error types.
pub mod error;

/// Source-like excerpts and the type unparser.
pub mod excerpt;

/// Markdown rendering helpers.
pub mod markdown;

/// The documentation model, its builder and link resolution.
pub mod model;

/// Entry pathname computation.
pub mod paths;

/// Input symbol-graph types.
pub mod reflect;

/// Slug allocation.
pub mod slug;

pub use crate::error::{Result, TydocError};
pub use crate::excerpt::{Excerpt, ExcerptKind, ExcerptOptions, PlainTokenizer, Token, Tokenizer};
pub use crate::model::{DocModel, LinkResolver, ModelBuilder, Named, NamedId, Release};
pub use crate::paths::{BuildFormat, entry_pathname};
