use indexmap::IndexMap;
use log::{debug, trace};
use pick_semver::Operator;

use super::comparator::{version_compare, PackageComparator, Preference};
use super::{Literal, Pool};
use crate::config::PolicyConfig;
use crate::error::{PolicyError, Result};
use crate::package::{Package, PackageInterface};
use crate::repository::RepositoryId;

/// Decisions the solver delegates when several packages are eligible.
pub trait PolicyInterface {
    /// Whether installed packages may be removed
    fn allow_uninstall(&self) -> bool {
        true
    }

    /// Whether updates may move to an older version
    fn allow_downgrade(&self) -> bool {
        false
    }

    /// Whether `package` may be installed at all
    fn installable(&self, _pool: &Pool, _repository: RepositoryId, _package: &Package) -> bool {
        true
    }

    /// Order the candidate literals from most to least preferred,
    /// dropping the ones not worth trying.
    fn select_preferred(&self, pool: &Pool, installed: RepositoryId, literals: &[Literal]) -> Result<Vec<Literal>>;

    /// Packages `package` may be updated to.
    ///
    /// Candidates older than `package` are skipped unless
    /// `allow_downgrades` or [`allow_downgrade`](Self::allow_downgrade) is set.
    fn find_update_candidates<'p>(
        &self,
        pool: &'p Pool,
        _repository: RepositoryId,
        package: &Package,
        allow_downgrades: bool,
    ) -> Vec<&'p Package> {
        let allow_downgrades = allow_downgrades || self.allow_downgrade();

        pool.packages_by_name(&package.name)
            .iter()
            .filter_map(|&id| pool.package(id))
            .filter(|candidate| candidate.id() != package.id())
            .filter(|candidate| allow_downgrades || !version_compare(package, *candidate, Operator::GreaterThan))
            .collect()
    }
}

/// A candidate paired with the literal it came from
#[derive(Debug, Clone, Copy)]
struct Candidate<'p> {
    literal: Literal,
    package: &'p Package,
}

/// The default package selection policy.
///
/// For each package name it keeps the newest version, preferring an
/// installed copy and then the highest-priority repository, and orders
/// the survivors so that installed packages and replacing packages come
/// first.
#[derive(Debug, Clone, Default)]
pub struct DefaultPolicy {
    config: PolicyConfig,
}

impl DefaultPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Comparator over `pool` for a given installed repository
    pub fn comparator<'a>(&self, pool: &'a Pool, installed: RepositoryId) -> PackageComparator<'a> {
        PackageComparator::new(pool, installed).with_replace_preference(self.config.replace_preference)
    }

    /// Group literals by package name in first-seen order, installed
    /// packages moved to the front of their group.
    fn group_literals_by_name_prefer_installed<'p>(
        &self,
        pool: &'p Pool,
        installed: RepositoryId,
        literals: &[Literal],
    ) -> Result<IndexMap<&'p str, Vec<Candidate<'p>>>> {
        let mut partitions: IndexMap<&'p str, (Vec<Candidate<'p>>, Vec<Candidate<'p>>)> = IndexMap::new();

        for &literal in literals {
            let id = literal.package_id();
            let package = pool.package(id).ok_or(PolicyError::UnknownPackage(id))?;
            let (installed_part, rest) = partitions.entry(package.name.as_str()).or_default();

            let candidate = Candidate { literal, package };
            if package.repository() == Some(installed) {
                installed_part.push(candidate);
            } else {
                rest.push(candidate);
            }
        }

        Ok(partitions
            .into_iter()
            .map(|(name, (mut group, rest))| {
                group.extend(rest);
                (name, group)
            })
            .collect())
    }

    /// Keep installed candidates and the candidates with the highest version.
    fn prune_to_best_version<'p>(&self, installed: RepositoryId, group: Vec<Candidate<'p>>) -> Vec<Candidate<'p>> {
        let Some(mut best) = group.first().map(|candidate| candidate.package) else {
            return group;
        };
        for candidate in &group[1..] {
            if version_compare(candidate.package, best, Operator::GreaterThan) {
                best = candidate.package;
            }
        }

        group
            .into_iter()
            .filter(|candidate| {
                let keep = candidate.package.repository() == Some(installed)
                    || version_compare(candidate.package, best, Operator::Equal);
                if !keep {
                    trace!(
                        "Pruned {}: older than {}",
                        candidate.package.pretty_string(),
                        best.pretty_string()
                    );
                }
                keep
            })
            .collect()
    }

    /// Reorder sorted candidates so that each one follows every candidate
    /// that wins against it through a replace link.
    ///
    /// The winner takes the slot of the first candidate it beats, and the
    /// rest keep their sorted order.
    fn order_by_replace_links<'p>(
        &self,
        comparator: &PackageComparator<'_>,
        mut remaining: Vec<Candidate<'p>>,
    ) -> Vec<Candidate<'p>> {
        let mut ordered = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let mut index = 0;
            // a replace win overturns id order, so each winner has a larger id and the chain ends
            while let Some(winner) = (0..remaining.len())
                .find(|&other| other != index && wins_by_replace(comparator, &remaining[other], &remaining[index]))
            {
                trace!(
                    "Moved {} ahead of {}",
                    remaining[winner].package.pretty_string(),
                    remaining[index].package.pretty_string()
                );
                index = winner;
            }
            ordered.push(remaining.remove(index));
        }

        ordered
    }

    /// Keep installed candidates and the first priority tier of the rest.
    ///
    /// The group must already be sorted.
    fn prune_to_highest_priority_or_installed<'p>(
        &self,
        pool: &Pool,
        installed: RepositoryId,
        group: Vec<Candidate<'p>>,
    ) -> Vec<Candidate<'p>> {
        let mut selected = Vec::with_capacity(group.len());
        let mut tier = None;

        for candidate in group {
            if candidate.package.repository() == Some(installed) {
                selected.push(candidate);
                continue;
            }

            let priority = pool.package_priority(candidate.package);
            match tier {
                None => tier = Some(priority),
                Some(established) if established != priority => {
                    trace!(
                        "Stopped at {}: priority {} below {}",
                        candidate.package.pretty_string(),
                        priority,
                        established
                    );
                    break;
                }
                Some(_) => {}
            }
            selected.push(candidate);
        }

        selected
    }
}

impl PolicyInterface for DefaultPolicy {
    fn allow_uninstall(&self) -> bool {
        self.config.allow_uninstall
    }

    fn allow_downgrade(&self) -> bool {
        self.config.allow_downgrade
    }

    fn installable(&self, _pool: &Pool, _repository: RepositoryId, package: &Package) -> bool {
        !self.config.is_excluded(&package.name)
    }

    fn select_preferred(&self, pool: &Pool, installed: RepositoryId, literals: &[Literal]) -> Result<Vec<Literal>> {
        debug!("Selecting preferred packages among {} literals", literals.len());

        let comparator = self.comparator(pool, installed);
        let groups = self.group_literals_by_name_prefer_installed(pool, installed, literals)?;

        let mut selected = Vec::with_capacity(literals.len());
        for (name, mut group) in groups {
            // without replace links the comparator is a total order
            group.sort_by(|a, b| comparator.compare(a.package, b.package, true).to_ordering());

            let group = self.prune_to_best_version(installed, group);
            let group = self.prune_to_highest_priority_or_installed(pool, installed, group);
            trace!("Kept {} candidate(s) for {}", group.len(), name);

            selected.extend(group);
        }

        selected.sort_by(|a, b| comparator.compare(a.package, b.package, true).to_ordering());
        let selected = self.order_by_replace_links(&comparator, selected);

        debug!("Selected {} of {} literals", selected.len(), literals.len());
        Ok(selected.into_iter().map(|candidate| candidate.literal).collect())
    }
}

/// Whether `a` is ordered ahead of `b` only because of a replace link
fn wins_by_replace(comparator: &PackageComparator<'_>, a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    comparator.compare(a.package, b.package, false) == Preference::PreferA
        && comparator.compare(a.package, b.package, true) != Preference::PreferA
}
