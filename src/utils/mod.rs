//! Utility functions and helpers.

pub mod http;
pub mod url;

pub use url::{get_domain, resolve_url};
