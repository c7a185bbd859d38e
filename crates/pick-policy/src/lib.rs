//! Package selection policy for a SAT-based dependency resolver
//!
//! When several packages could satisfy the same requirement, the solver
//! asks a [`PolicyInterface`] to put the candidate [`Literal`]s in
//! preference order. The [`DefaultPolicy`] applies these rules:
//! installed packages first, then the newest version, then the
//! highest-priority repository, with replace relationships and package
//! ids as the final tie-breakers.

pub mod config;
pub mod error;
pub mod package;
pub mod repository;
pub mod solver;

pub use config::{PolicyConfig, ReplacePreference};
pub use error::{PolicyError, Result};
pub use package::{Link, LinkType, Package, PackageId, PackageInterface};
pub use repository::{Repository, RepositoryId};
pub use solver::{DefaultPolicy, Literal, PackageComparator, PolicyInterface, Pool, PoolBuilder, Preference};
