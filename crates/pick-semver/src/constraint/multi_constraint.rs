//! MultiConstraint - compound constraint combining multiple constraints

use std::fmt;

use super::{ConstraintInterface, MatchAllConstraint};

/// A constraint combining multiple constraints with AND (conjunctive) or OR (disjunctive) logic
#[derive(Debug, Clone)]
pub struct MultiConstraint {
    constraints: Vec<Box<dyn ConstraintInterface>>,
    conjunctive: bool,
    pretty_string: Option<String>,
}

impl MultiConstraint {
    /// Build the simplest constraint equivalent to the given list:
    /// nothing matches everything, a single entry is returned as-is.
    pub fn create(
        mut constraints: Vec<Box<dyn ConstraintInterface>>,
        conjunctive: bool,
    ) -> Box<dyn ConstraintInterface> {
        match constraints.len() {
            0 => Box::new(MatchAllConstraint::new()),
            1 => constraints.remove(0),
            _ => Box::new(MultiConstraint {
                constraints,
                conjunctive,
                pretty_string: None,
            }),
        }
    }

    pub fn constraints(&self) -> &[Box<dyn ConstraintInterface>] {
        &self.constraints
    }

    pub fn is_conjunctive(&self) -> bool {
        self.conjunctive
    }

    pub fn is_disjunctive(&self) -> bool {
        !self.conjunctive
    }
}

impl ConstraintInterface for MultiConstraint {
    fn matches(&self, provider: &dyn ConstraintInterface) -> bool {
        if !self.conjunctive {
            return self
                .constraints
                .iter()
                .any(|constraint| provider.matches(constraint.as_ref()));
        }

        if let Some((constraints, provider_conjunctive)) = provider.as_multi_constraint() {
            // AND against OR: let the disjunction drive
            if !provider_conjunctive {
                return provider.matches(self);
            }
            return constraints
                .iter()
                .all(|constraint| self.matches(constraint.as_ref()));
        }

        self.constraints
            .iter()
            .all(|constraint| provider.matches(constraint.as_ref()))
    }

    fn pretty_string(&self) -> String {
        self.pretty_string
            .clone()
            .unwrap_or_else(|| self.to_string())
    }

    fn set_pretty_string(&mut self, pretty: Option<String>) {
        self.pretty_string = pretty;
    }

    fn clone_box(&self) -> Box<dyn ConstraintInterface> {
        Box::new(self.clone())
    }

    fn as_multi_constraint(&self) -> Option<(&[Box<dyn ConstraintInterface>], bool)> {
        Some((&self.constraints, self.conjunctive))
    }
}

impl fmt::Display for MultiConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.constraints.iter().map(|c| c.to_string()).collect();
        let separator = if self.conjunctive { " " } else { " || " };
        write!(f, "[{}]", parts.join(separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, Operator};

    fn boxed(op: Operator, version: &str) -> Box<dyn ConstraintInterface> {
        Box::new(Constraint::new(op, version))
    }

    fn range() -> Box<dyn ConstraintInterface> {
        MultiConstraint::create(
            vec![
                boxed(Operator::GreaterThanOrEqual, "1.0.0.0"),
                boxed(Operator::LessThan, "2.0.0.0"),
            ],
            true,
        )
    }

    #[test]
    fn test_conjunctive_requires_every_member() {
        let range = range();

        assert_eq!(range.as_multi_constraint().map(|(_, conjunctive)| conjunctive), Some(true));
        assert!(range.matches(&Constraint::new(Operator::Equal, "1.5.0.0")));
        assert!(!range.matches(&Constraint::new(Operator::Equal, "2.0.0.0")));
        assert!(!range.matches(&Constraint::new(Operator::Equal, "0.9.0.0")));
    }

    #[test]
    fn test_disjunctive_requires_any_member() {
        let either = MultiConstraint::create(
            vec![
                boxed(Operator::Equal, "1.0.0.0"),
                boxed(Operator::Equal, "2.0.0.0"),
            ],
            false,
        );

        assert_eq!(either.as_multi_constraint().map(|(_, conjunctive)| conjunctive), Some(false));
        assert!(either.matches(&Constraint::new(Operator::Equal, "2.0.0.0")));
        assert!(!either.matches(&Constraint::new(Operator::Equal, "1.5.0.0")));
        assert_eq!(either.to_string(), "[== 1.0.0.0 || == 2.0.0.0]");
    }

    #[test]
    fn test_single_constraint_matches_through_multi() {
        let exact = Constraint::new(Operator::Equal, "1.5.0.0");
        assert!(exact.matches(range().as_ref()));
    }

    #[test]
    fn test_create_collapses_trivial_lists() {
        assert!(MultiConstraint::create(vec![], true).is_match_all());

        let single = MultiConstraint::create(vec![boxed(Operator::Equal, "1.0.0")], true);
        assert!(single.as_constraint().is_some());

        let pair = MultiConstraint::create(
            vec![boxed(Operator::Equal, "1.0.0"), boxed(Operator::Equal, "2.0.0")],
            false,
        );
        assert!(pair.as_multi_constraint().is_some());
    }
}
