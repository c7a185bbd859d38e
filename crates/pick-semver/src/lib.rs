//! Version constraint matching compatible with Composer/semver
//!
//! Versions are expected to be normalized already (e.g. `1.2.0.0`,
//! `2.0.0.0-beta1`, `dev-master`). This crate only compares them and
//! matches them against operator constraints.

pub mod constraint;
mod parser;

pub use constraint::{
    compare_versions, php_version_compare, Constraint, ConstraintInterface, MatchAllConstraint, MultiConstraint,
    Operator,
};
pub use parser::{ConstraintParseError, ConstraintParser};
