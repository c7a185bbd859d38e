//! Single version constraint implementation

use std::cmp::Ordering;
use std::fmt;

use super::operator::Direction;
use super::{ConstraintInterface, Operator};

/// A single version constraint (e.g. `>= 1.0.0.0`)
#[derive(Debug, Clone)]
pub struct Constraint {
    operator: Operator,
    version: String,
    pretty_string: Option<String>,
}

impl Constraint {
    pub fn new(operator: Operator, version: impl Into<String>) -> Self {
        Constraint {
            operator,
            version: version.into(),
            pretty_string: None,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Whether the set of versions accepted by `self` intersects the set
    /// accepted by `provider`.
    ///
    /// With `compare_branches` unset, a `dev-*` branch version never
    /// matches a numeric one.
    pub fn match_specific(&self, provider: &Constraint, compare_branches: bool) -> bool {
        let is_equal_op = self.operator == Operator::Equal;
        let is_non_equal_op = self.operator == Operator::NotEqual;
        let is_provider_equal_op = provider.operator == Operator::Equal;
        let is_provider_non_equal_op = provider.operator == Operator::NotEqual;

        if is_non_equal_op || is_provider_non_equal_op {
            if is_non_equal_op
                && !is_provider_non_equal_op
                && !is_provider_equal_op
                && is_branch(&provider.version)
            {
                return false;
            }

            if is_provider_non_equal_op && !is_non_equal_op && !is_equal_op && is_branch(&self.version)
            {
                return false;
            }

            if !is_equal_op && !is_provider_equal_op {
                return true;
            }

            return version_compare(
                &provider.version,
                &self.version,
                Operator::NotEqual,
                compare_branches,
            );
        }

        let direction = self.operator.direction();
        let provider_direction = provider.operator.direction();

        // two half-open ranges pointing the same way always overlap
        if direction.is_some() && direction == provider_direction {
            return !(is_branch(&self.version) || is_branch(&provider.version));
        }

        let (version1, version2, operator) = if is_equal_op {
            (&self.version, &provider.version, provider.operator)
        } else {
            (&provider.version, &self.version, self.operator)
        };

        if !version_compare(version1, version2, operator, compare_branches) {
            return false;
        }

        match (direction, provider_direction) {
            (Some(Direction::Below), Some(Direction::Above))
            | (Some(Direction::Above), Some(Direction::Below))
                if compare_versions(&provider.version, &self.version) == Ordering::Equal =>
            {
                // `>= 2` and `<= 2` meet at 2; `> 2` and `<= 2` do not
                self.operator.is_inclusive() && provider.operator.is_inclusive()
            }
            _ => true,
        }
    }
}

fn is_branch(version: &str) -> bool {
    version.starts_with("dev-")
}

/// Compare two normalized versions with `operator`, treating `dev-*`
/// branches as only comparable to themselves.
fn version_compare(a: &str, b: &str, operator: Operator, compare_branches: bool) -> bool {
    let a_is_branch = is_branch(a);
    let b_is_branch = is_branch(b);

    if operator == Operator::NotEqual && (a_is_branch || b_is_branch) {
        return a != b;
    }

    if a_is_branch && b_is_branch {
        return operator == Operator::Equal && a == b;
    }

    if !compare_branches && (a_is_branch || b_is_branch) {
        return false;
    }

    php_version_compare(a, b, operator)
}

impl ConstraintInterface for Constraint {
    fn matches(&self, other: &dyn ConstraintInterface) -> bool {
        if let Some((operator, version)) = other.as_constraint() {
            return self.match_specific(&Constraint::new(operator, version), false);
        }

        if other.is_match_all() {
            return true;
        }

        other.matches(self)
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

    fn as_constraint(&self) -> Option<(Operator, &str)> {
        Some((self.operator, &self.version))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operator, self.version)
    }
}

/// PHP-compatible `version_compare($a, $b, $operator)`
pub fn php_version_compare(a: &str, b: &str, operator: Operator) -> bool {
    let cmp = compare_versions(a, b);

    match operator {
        Operator::Equal => cmp == Ordering::Equal,
        Operator::NotEqual => cmp != Ordering::Equal,
        Operator::LessThan => cmp == Ordering::Less,
        Operator::LessThanOrEqual => cmp != Ordering::Greater,
        Operator::GreaterThan => cmp == Ordering::Greater,
        Operator::GreaterThanOrEqual => cmp != Ordering::Less,
    }
}

/// Three-way comparison of two version strings, segment by segment.
///
/// Numeric segments compare numerically and outrank alphabetic ones;
/// alphabetic segments compare by their stability rank
/// (`dev < alpha < beta < RC < stable < patch`).
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut a_parts = Segments::new(a);
    let mut b_parts = Segments::new(b);

    loop {
        match (a_parts.next(), b_parts.next()) {
            (None, None) => return Ordering::Equal,
            (a_part, b_part) => {
                // a missing segment compares like an empty word
                let cmp = compare_segment(
                    a_part.unwrap_or(Segment::Word("")),
                    b_part.unwrap_or(Segment::Word("")),
                );
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Segment<'a> {
    Number(&'a str),
    Word(&'a str),
}

/// Splits a version into alternating runs of digits and letters,
/// dropping every separator in between.
struct Segments<'a> {
    input: &'a str,
    index: usize,
}

impl<'a> Segments<'a> {
    fn new(input: &'a str) -> Self {
        Segments { input, index: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.input.as_bytes();
        while self.index < bytes.len() && !bytes[self.index].is_ascii_alphanumeric() {
            self.index += 1;
        }
        if self.index >= bytes.len() {
            return None;
        }

        let start = self.index;
        let numeric = bytes[start].is_ascii_digit();
        self.index += 1;
        while self.index < bytes.len() {
            let b = bytes[self.index];
            let same_kind = if numeric {
                b.is_ascii_digit()
            } else {
                b.is_ascii_alphabetic()
            };
            if !same_kind {
                break;
            }
            self.index += 1;
        }

        let text = &self.input[start..self.index];
        Some(if numeric {
            Segment::Number(text)
        } else {
            Segment::Word(text)
        })
    }
}

fn compare_segment(a: Segment<'_>, b: Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Number(a), Segment::Number(b)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            // longer digit runs than u64 holds: compare by length, then text
            _ => {
                let a = a.trim_start_matches('0');
                let b = b.trim_start_matches('0');
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
        },
        (Segment::Number(_), Segment::Word(_)) => Ordering::Greater,
        (Segment::Word(_), Segment::Number(_)) => Ordering::Less,
        (Segment::Word(a), Segment::Word(b)) => stability_rank(a).cmp(&stability_rank(b)),
    }
}

fn stability_rank(word: &str) -> u8 {
    match word.to_ascii_lowercase().as_str() {
        "dev" => 0,
        "alpha" | "a" => 1,
        "beta" | "b" => 2,
        "rc" => 3,
        "patch" | "pl" | "p" => 5,
        // "", "stable" and anything unrecognised
        _ => 4,
    }
}
