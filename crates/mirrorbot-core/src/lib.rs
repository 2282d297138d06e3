//! Core logic for the mirrorbot outbound logging pipeline.
//!
//! This crate is intentionally transport-agnostic. The chat platform lives
//! behind the [`messaging::RemoteSink`] port, and the database behind
//! [`db::Database`]; the binary crate does the wiring.

pub mod card;
pub mod config;
pub mod console;
pub mod db;
pub mod dispatch;
pub mod errors;
pub mod grouping;
pub mod level;
pub mod logging;
pub mod messaging;
pub mod recurring;
pub mod segment;
pub mod text;

pub use errors::{Error, Result};
