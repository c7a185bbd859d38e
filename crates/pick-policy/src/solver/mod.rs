//! Solver-facing side of the package model: the pool, literals and the
//! policy that orders candidates.

mod comparator;
mod literal;
mod policy;
mod pool;

pub use comparator::{replaces, version_compare, PackageComparator, Preference};
pub use literal::Literal;
pub use policy::{DefaultPolicy, PolicyInterface};
pub use pool::{Pool, PoolBuilder};
