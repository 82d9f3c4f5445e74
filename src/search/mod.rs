//! Search providers
//!
//! A provider turns a query into a lazy stream of raw result URLs. The
//! orchestrator pulls from the stream until it has enough candidates and then
//! drops it, which stops any further page fetches.

mod google;

pub use google::GoogleSearch;

use futures::stream::BoxStream;

/// Source of candidate URLs for a query
///
/// Locale, country and pacing are bound when the provider is constructed.
/// Each call starts a fresh, independent result sequence.
pub trait SearchProvider: Send + Sync {
    fn search(&self, query: &str) -> BoxStream<'static, String>;
}
