//! Cobertura Core - Domain models, configuration, and errors
//!
//! This crate contains the record and aggregate models shared by every stage of
//! the coverage pipeline, together with the layered configuration and the
//! developer access token.

pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use error::{CoberturaError, Result};
