#![warn(missing_docs)]
//! # notemark
//!
//! A transcoding engine between a typed note document tree and an extended Markdown dialect.
//!
//! The tree follows the ProseMirror model: a [schema](model::Schema) of node and mark types, with
//! content rules for every node type. The [`markdown`] module defines the concrete schema and
//! converts between the tree and text:
//!
//! ```
//! use notemark::markdown::{from_markdown, to_markdown};
//!
//! let src = "::: tip\nSee ::spoiler[the answer].\n:::\n";
//! let doc = from_markdown(src);
//! assert_eq!(to_markdown(&doc), src);
//! ```
//!
//! Quiz and mind-map nodes carry JSON payloads that are decoded by the [`payload`] codecs, and
//! node views write attribute changes back through [`transform`] steps.

pub mod config;
pub(crate) mod de;
pub mod markdown;
pub mod model;
pub mod payload;
pub mod transform;
