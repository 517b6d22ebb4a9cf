//! Restcheck Infrastructure - Adapters and runners
//!
//! This crate provides the reqwest transport behind the application ports,
//! payload serialization, scenario catalogs, and the case and suite runners.

pub mod adapters;
pub mod catalog;
pub mod serialization;
pub mod testing;

pub use adapters::{ReqwestProvider, ReqwestTransport};
pub use catalog::{
    CatalogError, CatalogFile, CatalogFormat, LoadedCatalog, builtin_catalog, load_catalog,
    parse_catalog,
};
pub use serialization::{SerializationError, encode_payload, from_json, to_json_compact};
pub use testing::{CaseRunner, SuiteRunner, TestRunner};
