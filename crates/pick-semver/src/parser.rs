//! Parsing of constraint strings over normalized versions
//!
//! Only the operator and boolean structure is parsed here: `"*"`,
//! `"== 5.0.0.0"`, `">=1.0.0.0 <2.0.0.0"`, `">=1.0.0.0, <2.0.0.0"`,
//! `"1.0.0.0 || 2.0.0.0"`. Versions are taken verbatim; caret, tilde,
//! hyphen and wildcard-suffix ranges are not expanded.

use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

use crate::constraint::{Constraint, ConstraintInterface, MatchAllConstraint, MultiConstraint, Operator};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintParseError {
    #[error("Empty version constraint")]
    Empty,
    #[error("Could not parse version constraint {constraint}: {reason}")]
    Invalid { constraint: String, reason: String },
}

lazy_static! {
    static ref OR_SPLIT_RE: Regex = Regex::new(r"\s*\|\|?\s*").unwrap();
    /// An operator followed by whitespace, so `>= 1.0` can be glued to `>=1.0`
    static ref LOOSE_OPERATOR_RE: Regex = Regex::new(r"(<>|!=|>=?|<=?|==?)\s+").unwrap();
    static ref AND_SPLIT_RE: Regex = Regex::new(r"\s*,\s*|\s+").unwrap();
    static ref ATOM_RE: Regex = Regex::new(r"^(<>|!=|>=?|<=?|==?)?([^\s,<>=!|]+)$").unwrap();
    static ref WILDCARD_RE: Regex = Regex::new(r"^[xX*](\.[xX*])*$").unwrap();
}

/// Parser turning constraint strings into constraint objects
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintParser;

impl ConstraintParser {
    pub fn new() -> Self {
        ConstraintParser
    }

    /// Parse a constraint string into a boxed constraint
    pub fn parse(&self, constraints: &str) -> Result<Box<dyn ConstraintInterface>, ConstraintParseError> {
        let trimmed = constraints.trim();
        if trimmed.is_empty() {
            return Err(ConstraintParseError::Empty);
        }

        let or_parts: Vec<&str> = OR_SPLIT_RE.split(trimmed).collect();
        if or_parts.first().is_some_and(|part| part.is_empty()) {
            return Err(invalid(trimmed, "leading operator"));
        }
        if or_parts.last().is_some_and(|part| part.is_empty()) {
            return Err(invalid(trimmed, "trailing operator"));
        }

        let mut or_groups = Vec::with_capacity(or_parts.len());
        for or_part in or_parts {
            let glued = LOOSE_OPERATOR_RE.replace_all(or_part, "$1");
            let mut and_group = Vec::new();
            for atom in AND_SPLIT_RE.split(glued.trim()) {
                if atom.is_empty() {
                    return Err(invalid(trimmed, "empty constraint between separators"));
                }
                and_group.push(self.parse_atom(trimmed, atom)?);
            }
            or_groups.push(MultiConstraint::create(and_group, true));
        }

        let mut parsed = MultiConstraint::create(or_groups, false);
        parsed.set_pretty_string(Some(constraints.to_string()));
        Ok(parsed)
    }

    fn parse_atom(
        &self,
        full: &str,
        atom: &str,
    ) -> Result<Box<dyn ConstraintInterface>, ConstraintParseError> {
        if WILDCARD_RE.is_match(atom) {
            return Ok(Box::new(MatchAllConstraint::new()));
        }

        let caps = ATOM_RE
            .captures(atom)
            .ok_or_else(|| invalid(full, &format!("unexpected token \"{}\"", atom)))?;

        let operator = match caps.get(1) {
            Some(op) => Operator::from_str(op.as_str()).map_err(|e| invalid(full, &e.to_string()))?,
            None => Operator::Equal,
        };
        let version = &caps[2];
        if WILDCARD_RE.is_match(version) {
            return Err(invalid(full, "wildcard cannot follow an operator"));
        }

        Ok(Box::new(Constraint::new(operator, version)))
    }
}

fn invalid(constraint: &str, reason: &str) -> ConstraintParseError {
    ConstraintParseError::Invalid {
        constraint: constraint.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(version: &str) -> Constraint {
        Constraint::new(Operator::Equal, version)
    }

    #[test]
    fn test_parse_wildcard() {
        let parser = ConstraintParser::new();
        let parsed = parser.parse("*").unwrap();
        assert!(parsed.is_match_all());
        assert_eq!(parsed.pretty_string(), "*");
    }

    #[test]
    fn test_parse_single_operator() {
        let parser = ConstraintParser::new();

        let parsed = parser.parse("== 5.0.0.0").unwrap();
        assert_eq!(parsed.as_constraint(), Some((Operator::Equal, "5.0.0.0")));

        let parsed = parser.parse(">=1.0.0.0").unwrap();
        assert_eq!(parsed.as_constraint(), Some((Operator::GreaterThanOrEqual, "1.0.0.0")));

        let parsed = parser.parse("2.0.0.0").unwrap();
        assert_eq!(parsed.as_constraint(), Some((Operator::Equal, "2.0.0.0")));
    }

    #[test]
    fn test_parse_conjunction() {
        let parser = ConstraintParser::new();

        for input in [">=1.0.0.0 <2.0.0.0", ">= 1.0.0.0, < 2.0.0.0", ">=1.0.0.0,<2.0.0.0"] {
            let parsed = parser.parse(input).unwrap();
            let (members, conjunctive) = parsed.as_multi_constraint().unwrap();
            assert!(conjunctive, "{}", input);
            assert_eq!(members.len(), 2, "{}", input);
            assert!(parsed.matches(&exact("1.5.0.0")));
            assert!(!parsed.matches(&exact("2.0.0.0")));
        }
    }

    #[test]
    fn test_parse_disjunction() {
        let parser = ConstraintParser::new();
        let parsed = parser.parse("1.0.0.0 || >=3.0.0.0").unwrap();

        let (_, conjunctive) = parsed.as_multi_constraint().unwrap();
        assert!(!conjunctive);
        assert!(parsed.matches(&exact("1.0.0.0")));
        assert!(parsed.matches(&exact("3.1.0.0")));
        assert!(!parsed.matches(&exact("2.0.0.0")));
        assert_eq!(parsed.pretty_string(), "1.0.0.0 || >=3.0.0.0");
    }

    #[test]
    fn test_parse_errors() {
        let parser = ConstraintParser::new();

        assert_eq!(parser.parse("  ").unwrap_err(), ConstraintParseError::Empty);
        assert!(matches!(
            parser.parse("|| 1.0").unwrap_err(),
            ConstraintParseError::Invalid { reason, .. } if reason == "leading operator"
        ));
        assert!(matches!(
            parser.parse("1.0 ||").unwrap_err(),
            ConstraintParseError::Invalid { reason, .. } if reason == "trailing operator"
        ));
        assert!(parser.parse("=>1.0").is_err());
        assert!(parser.parse(">=*").is_err());
    }
}
