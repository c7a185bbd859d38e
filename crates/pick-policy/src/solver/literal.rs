use std::fmt;
use std::ops::Neg;

use crate::error::{PolicyError, Result};
use crate::package::PackageId;

/// A solver variable bound to one package.
///
/// Positive literals mean "install package |n|", negative ones mean
/// "do not install it". The policy only looks at the package id and
/// carries the sign through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Literal(i32);

impl Literal {
    /// Literal requesting installation of `id`.
    ///
    /// Fails for ids above `i32::MAX`, which have no positive literal.
    pub fn install(id: PackageId) -> Result<Self> {
        i32::try_from(id.get())
            .map(Self)
            .map_err(|_| PolicyError::LiteralOutOfRange(id))
    }

    /// Literal forbidding installation of `id`
    pub fn forbid(id: PackageId) -> Result<Self> {
        Self::install(id).map(Neg::neg)
    }

    pub fn package_id(self) -> PackageId {
        PackageId::new(self.0.unsigned_abs())
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn raw(self) -> i32 {
        self.0
    }
}

impl Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Literal {
        Literal(-self.0)
    }
}

impl From<i32> for Literal {
    fn from(raw: i32) -> Self {
        Literal(raw)
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> Self {
        literal.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "+{}", self.package_id())
        } else {
            write!(f, "-{}", self.package_id())
        }
    }
}
