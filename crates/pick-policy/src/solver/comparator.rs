//! Pairwise package ordering used by the selection policy

use log::trace;
use pick_semver::{Constraint, Operator};
use std::cmp::Ordering;

use super::Pool;
use crate::config::ReplacePreference;
use crate::package::PackageInterface;
use crate::repository::RepositoryId;

/// Outcome of comparing two candidates `a` and `b`: which one sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    PreferA,
    PreferB,
    Equal,
}

impl Preference {
    /// Ordering for sort functions: the preferred side sorts first
    pub fn to_ordering(self) -> Ordering {
        match self {
            Preference::PreferA => Ordering::Less,
            Preference::PreferB => Ordering::Greater,
            Preference::Equal => Ordering::Equal,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Preference::PreferA => Preference::PreferB,
            Preference::PreferB => Preference::PreferA,
            Preference::Equal => Preference::Equal,
        }
    }
}

impl From<Ordering> for Preference {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Preference::PreferA,
            Ordering::Greater => Preference::PreferB,
            Ordering::Equal => Preference::Equal,
        }
    }
}

/// Compare the versions of two packages: `a <operator> b`.
///
/// Goes through constraint matching rather than a direct comparison so
/// that branch versions (`dev-*`) compare the same way they do when
/// matched against requirements.
pub fn version_compare<A, B>(a: &A, b: &B, operator: Operator) -> bool
where
    A: PackageInterface + ?Sized,
    B: PackageInterface + ?Sized,
{
    let constraint = Constraint::new(operator, b.version());
    let version = Constraint::new(Operator::Equal, a.version());

    constraint.match_specific(&version, true)
}

/// Whether `source` declares a replace link covering `target`'s name and version
pub fn replaces<A, B>(source: &A, target: &B) -> bool
where
    A: PackageInterface + ?Sized,
    B: PackageInterface + ?Sized,
{
    source
        .replaces()
        .iter()
        .any(|link| link.target == target.name() && link.matches_version(target.version()))
}

/// Orders two candidates the way the default policy prefers them.
///
/// Holds only borrowed, read-only state for the duration of one
/// selection.
#[derive(Debug, Clone, Copy)]
pub struct PackageComparator<'a> {
    pool: &'a Pool,
    installed: RepositoryId,
    replace_preference: ReplacePreference,
}

impl<'a> PackageComparator<'a> {
    pub fn new(pool: &'a Pool, installed: RepositoryId) -> Self {
        Self {
            pool,
            installed,
            replace_preference: ReplacePreference::default(),
        }
    }

    pub fn with_replace_preference(mut self, preference: ReplacePreference) -> Self {
        self.replace_preference = preference;
        self
    }

    /// Compare `a` and `b`:
    ///
    /// 1. Same repository: replace links (unless `ignore_replace`), then id.
    /// 2. An installed package beats one that is not.
    /// 3. Higher repository priority wins.
    /// 4. Equal priority: replace links (unless `ignore_replace`), then id.
    pub fn compare<A, B>(&self, a: &A, b: &B, ignore_replace: bool) -> Preference
    where
        A: PackageInterface + ?Sized,
        B: PackageInterface + ?Sized,
    {
        if a.repository() == b.repository() {
            return self.compare_replace_then_id(a, b, ignore_replace);
        }

        if a.repository() == Some(self.installed) {
            return Preference::PreferA;
        }
        if b.repository() == Some(self.installed) {
            return Preference::PreferB;
        }

        match self.pool.package_priority(a).cmp(&self.pool.package_priority(b)) {
            Ordering::Greater => Preference::PreferA,
            Ordering::Less => Preference::PreferB,
            Ordering::Equal => self.compare_replace_then_id(a, b, ignore_replace),
        }
    }

    fn compare_replace_then_id<A, B>(&self, a: &A, b: &B, ignore_replace: bool) -> Preference
    where
        A: PackageInterface + ?Sized,
        B: PackageInterface + ?Sized,
    {
        if !ignore_replace {
            if let Some(preference) = self.compare_replace(a, b) {
                return preference;
            }
        }

        a.id().cmp(&b.id()).into()
    }

    fn compare_replace<A, B>(&self, a: &A, b: &B) -> Option<Preference>
    where
        A: PackageInterface + ?Sized,
        B: PackageInterface + ?Sized,
    {
        let replacer_first = if replaces(a, b) {
            trace!("{} replaces {}", a.pretty_string(), b.pretty_string());
            Preference::PreferA
        } else if replaces(b, a) {
            trace!("{} replaces {}", b.pretty_string(), a.pretty_string());
            Preference::PreferB
        } else {
            return None;
        };

        Some(match self.replace_preference {
            ReplacePreference::Replacer => replacer_first,
            ReplacePreference::Original => replacer_first.reverse(),
        })
    }
}
