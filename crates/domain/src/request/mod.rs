//! HTTP request domain types

mod body;
mod method;
mod spec;

pub use body::{JSON_CONTENT_TYPE, RequestBody};
pub use method::HttpMethod;
pub use spec::RequestSpec;
