//! Source resolution: inline bytes, local files and remote URLs.

pub mod http;
mod resolver;

pub use http::{HttpGet, HttpResponse, TransportError, UreqClient};
pub use resolver::{ResolveError, SourceResolver};
