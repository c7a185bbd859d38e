use pick_semver::{Constraint, ConstraintInterface, ConstraintParser, Operator};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Type of package link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// Package provides this virtual package
    #[serde(rename = "provides")]
    Provide,
    /// Replaces this package
    #[serde(rename = "replaces")]
    Replace,
}

impl LinkType {
    /// Returns a human-readable description of the link type
    pub fn description(&self) -> &'static str {
        match self {
            LinkType::Provide => "provides",
            LinkType::Replace => "replaces",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Represents a link between two packages
///
/// A link connects a source package to a target package name with an
/// optional version constraint. The constraint is parsed when the link
/// is created; without one the link covers every version of the target.
#[derive(Debug, Clone)]
pub struct Link {
    /// Source package name (lowercase)
    pub source: String,
    /// Target package name (lowercase)
    pub target: String,
    /// Constraint string as declared, if any
    pub pretty_constraint: Option<String>,
    /// Type of link
    pub link_type: LinkType,
    constraint: Option<Box<dyn ConstraintInterface>>,
}

impl Link {
    /// Creates a new link, parsing `constraint` when present
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        constraint: Option<&str>,
        link_type: LinkType,
    ) -> Result<Self> {
        let parsed = match constraint {
            Some(constraint) => Some(ConstraintParser::new().parse(constraint)?),
            None => None,
        };

        Ok(Self {
            source: source.into().to_lowercase(),
            target: target.into().to_lowercase(),
            pretty_constraint: constraint.map(str::to_string),
            link_type,
            constraint: parsed,
        })
    }

    pub fn replace(source: impl Into<String>, target: impl Into<String>, constraint: Option<&str>) -> Result<Self> {
        Self::new(source, target, constraint, LinkType::Replace)
    }

    pub fn provide(source: impl Into<String>, target: impl Into<String>, constraint: Option<&str>) -> Result<Self> {
        Self::new(source, target, constraint, LinkType::Provide)
    }

    /// The parsed constraint, `None` when the link covers any version
    pub fn constraint(&self) -> Option<&dyn ConstraintInterface> {
        self.constraint.as_deref()
    }

    /// Whether the link covers exactly `version` of its target
    pub fn matches_version(&self, version: &str) -> bool {
        match &self.constraint {
            Some(constraint) => constraint.matches(&Constraint::new(Operator::Equal, version)),
            None => true,
        }
    }

    /// Constraint as written, `*` when absent
    pub fn pretty_constraint(&self) -> &str {
        self.pretty_constraint.as_deref().unwrap_or("*")
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.source,
            self.link_type,
            self.target,
            self.pretty_constraint()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_lowercases_names() {
        let link = Link::replace("Vendor/Fork", "Vendor/Original", Some("== 1.0.0.0")).unwrap();
        assert_eq!(link.source, "vendor/fork");
        assert_eq!(link.target, "vendor/original");
        assert_eq!(link.link_type, LinkType::Replace);
    }

    #[test]
    fn test_link_without_constraint_matches_any_version() {
        let link = Link::replace("a", "b", None).unwrap();
        assert!(link.constraint().is_none());
        assert!(link.matches_version("1.0.0.0"));
        assert!(link.matches_version("dev-master"));
        assert_eq!(link.pretty_constraint(), "*");
    }

    #[test]
    fn test_link_constraint_matching() {
        let link = Link::replace("mysql-client", "mysql", Some("== 5.0")).unwrap();
        assert!(link.matches_version("5.0"));
        assert!(!link.matches_version("5.1"));

        let range = Link::provide("a", "psr/log-implementation", Some(">=1.0 <2.0")).unwrap();
        assert!(range.matches_version("1.5"));
        assert!(!range.matches_version("2.0"));
    }

    #[test]
    fn test_link_invalid_constraint() {
        let err = Link::replace("a", "b", Some("|| 1.0")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid version constraint"));
    }

    #[test]
    fn test_link_display() {
        let link = Link::replace("mysql-client", "mysql", Some("== 5.0")).unwrap();
        assert_eq!(link.to_string(), "mysql-client replaces mysql (== 5.0)");
    }
}
