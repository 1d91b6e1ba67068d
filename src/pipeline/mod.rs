//! The content pipeline: everything between a Markdown note on disk and the
//! HTML body handed to the page templates.
//!
//! Stages run in a fixed order for each post:
//!
//! ```text
//! discover    find eligible notes, assign slugs
//!    |
//! sanitize    redact secrets, IPs, and scrubbed terms (raw Markdown)
//!    |
//! images      rewrite local image references, queue copies
//!    |
//! markdown    title, teaser, Markdown -> HTML
//!    |
//! categorize  assign a category from the source path
//! ```
//!
//! Sanitization runs on the raw Markdown, before any other transformation,
//! so redaction never has to reason about HTML.

pub mod categorize;
pub mod discover;
pub mod images;
pub mod markdown;
pub mod sanitize;
