use pick_semver::ConstraintParseError;
use thiserror::Error;

use crate::package::PackageId;
use crate::repository::RepositoryId;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid version constraint: {0}")]
    InvalidConstraint(#[from] ConstraintParseError),

    #[error("Package not found in pool: {0}")]
    UnknownPackage(PackageId),

    #[error("Package id {0} does not fit in a solver literal")]
    LiteralOutOfRange(PackageId),

    #[error("Repository not found in pool: {0}")]
    UnknownRepository(RepositoryId),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
