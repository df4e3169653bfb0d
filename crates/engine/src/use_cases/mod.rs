//! Use cases: the location directory and the well, borehole and parameter
//! catalogs.
//!
//! Each holds `Arc<dyn ...Repo>` ports and is cheap to build per request.

use std::future::Future;

use fieldreg_domain::{code_candidates, DomainError};

use crate::infrastructure::ports::RepoError;

pub mod boreholes;
pub mod locations;
pub mod parameters;
pub mod validation;
pub mod wells;

pub use boreholes::BoreholeCatalog;
pub use locations::LocationDirectory;
pub use parameters::ParameterCatalog;
pub use wells::WellCatalog;

use validation::ValidationError;

/// Shared error type for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl CatalogError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// First of `base`, `base_1`, `base_2`, … that `is_taken` rejects.
///
/// `is_taken` should report `false` for a code held by the record being
/// updated, so renaming to its own code is a no-op.
pub(crate) async fn first_free_code<F, Fut>(base: &str, mut is_taken: F) -> Result<String, RepoError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, RepoError>>,
{
    for candidate in code_candidates(base) {
        if !is_taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    // code_candidates never ends
    Ok(base.to_string())
}
