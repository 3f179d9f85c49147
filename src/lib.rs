//! # bookshelf
//!
//! A small web application for managing authors, the books they wrote and
//! the comments left on their pages.
//!
//! - [`domain`]: record types and identifiers
//! - [`infrastructure`]: the `LibraryStore` trait, its SQL and in-memory
//!   implementations and environment-driven backend selection
//! - [`api`]: axum handlers, one-shot notices and HTML presentation

pub mod api;
pub mod domain;
pub mod infrastructure;
