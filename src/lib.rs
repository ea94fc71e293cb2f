#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
/// Processor settings and their TOML form
pub mod config;
/// Error handling and custom [`Error`](std::error::Error) types
pub mod errors;
/// Audit sinks for finished transfers
pub mod io;
/// Business logic for locking, crediting and debiting accounts
mod ops;
/// Data types used throughout the crate
pub mod types;

pub use ops::{credit, debit};
