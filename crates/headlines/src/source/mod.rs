//! Upstream content sources.

mod newsapi;

pub use newsapi::NewsApiSource;
