//! Functional core for the headlines service.
//!
//! Holds the article domain, the cache key layout and field-map codec, the
//! error taxonomy shared by every tier, and the traits each tier implements.
//! Nothing in this crate performs I/O.

pub mod article;
pub mod cache;
pub mod error;
pub mod source;
pub mod storage;

pub use error::ErrorKind;
