//! JSON serialization collaborator.
//!
//! Encodes payload models as compact UTF-8 JSON tagged with a content type,
//! and decodes JSON for response inspection and catalog files.

mod json;

pub use json::*;
