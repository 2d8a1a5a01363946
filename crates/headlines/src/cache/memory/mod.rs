//! In-memory cache backend implementation.
//!
//! Mirrors the Redis layout (string field-maps plus index sets) inside the
//! process, for single-instance deployments and tests.

mod cache;

pub use cache::MemoryCache;
