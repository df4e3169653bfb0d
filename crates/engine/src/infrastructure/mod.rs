//! Infrastructure implementations.
//!
//! Contains the port traits, their SQLite implementations and runtime
//! configuration.

pub mod config;
pub mod ports;
pub mod sqlite;
