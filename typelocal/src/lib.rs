//! typelocal caches values derived from Rust types, e.g. introspection results, adapters or
//! serializer tables, so that hot paths compute them once per type instead of on every call.
//!
//! [`TypeLocal`] computes the value for a [`TypeKey`] on first access and serves it from a
//! lock-free snapshot afterwards. Racing first accesses may compute more than once, the first
//! published value is the one that stays cached.
//!
//! The [`maths`] module holds the numeric helpers that usually sit next to such caches.

pub mod cache;
pub mod error;
pub mod key;
pub mod logger;
pub mod maths;
pub mod settings;
mod macros;

pub use cache::TypeLocal;
pub use error::AppError;
pub use error::BoxError;
pub use key::TypeKey;
pub use logger::Level;
pub use once_cell;
pub use settings::CacheSettings;
