//! Infrastructure module for persistence.
//!
//! This module contains the store trait, its relational and in-memory
//! implementations, backend selection and the demonstration seed.

pub mod factory;
pub mod in_memory;
pub mod repository;
pub mod seed;
pub mod sql;

pub use factory::{
    ConfigurationError, DatabaseBackend, FactoryError, StoreConfig, StoreConfigBuilder,
    StoreFactory,
};
pub use in_memory::InMemoryStore;
pub use repository::{
    LibraryStore, Lookup, Record, RepositoryError, StoreFuture, load_or_fail, lookup,
};
pub use seed::seed_demo_authors;
pub use sql::{Dialect, SqlStore};
