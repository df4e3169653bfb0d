//! fieldreg engine library.
//!
//! Storage, caching and use cases around the fieldreg domain.
//!
//! ## Structure
//!
//! - `use_cases/` - The location directory and the well, borehole and parameter catalogs
//! - `infrastructure/` - Ports, SQLite adapters and configuration
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::{App, Session};
