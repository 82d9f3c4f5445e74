//! URL handling module for Safecrawl
//!
//! This module reduces search results to base domains, applies the exclude
//! list, and normalizes raw URLs into bare hostnames for probing.

mod domain;
mod hostname;
mod matcher;

pub use domain::base_domain;
pub use hostname::strip_to_hostname;
pub use matcher::is_excluded;
