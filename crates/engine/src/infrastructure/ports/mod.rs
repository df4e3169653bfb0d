//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete
//! types. One repository port per stored aggregate, so the SQLite adapters
//! can be swapped for mocks in use case tests.

mod error;
mod repos;

pub use error::RepoError;
pub use repos::{BoreholeRepo, LocationRepo, ParameterRepo, WellRepo};

#[cfg(test)]
pub use repos::{MockBoreholeRepo, MockLocationRepo, MockParameterRepo, MockWellRepo};
