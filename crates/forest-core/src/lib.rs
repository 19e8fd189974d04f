//! Core types and trait definitions for the forest plot registry.
//!
//! This crate is deliberately free of UI and database dependencies. The
//! storage backend and the terminal UI both depend on it.

pub mod error;
pub mod plot;
pub mod ranger;
pub mod selection;
pub mod store;

pub use error::{Error, Result};
