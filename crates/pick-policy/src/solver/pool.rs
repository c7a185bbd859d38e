use log::trace;
use std::collections::HashMap;

use crate::error::{PolicyError, Result};
use crate::package::{Package, PackageId, PackageInterface};
use crate::repository::{Repository, RepositoryId};

/// The set of all packages the solver can choose from.
///
/// Packages are grouped by repository; each repository carries the
/// priority the policy uses to choose between equal versions. Package ids
/// are assigned in insertion order starting at 1.
#[derive(Debug, Default)]
pub struct Pool {
    /// Packages indexed by id - 1
    packages: Vec<Package>,
    /// Package ids by lowercase name
    packages_by_name: HashMap<String, Vec<PackageId>>,
    /// Packages replacing or providing a name
    providers: HashMap<String, Vec<PackageId>>,
    repositories: Vec<Repository>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    /// Register a repository with the given priority
    pub fn add_repository(&mut self, name: impl Into<String>, priority: i32) -> RepositoryId {
        let id = RepositoryId::new(self.repositories.len() as u32);
        let repository = Repository::new(id, name, priority);
        trace!("Registered repository {} as {}", repository, id);
        self.repositories.push(repository);
        id
    }

    /// Add a package to a registered repository
    pub fn add_package(&mut self, repository: RepositoryId, package: Package) -> Result<PackageId> {
        if self.repository(repository).is_none() {
            return Err(PolicyError::UnknownRepository(repository));
        }
        Ok(self.insert_package(repository, package))
    }

    fn insert_package(&mut self, repository: RepositoryId, mut package: Package) -> PackageId {
        let id = PackageId::new(self.packages.len() as u32 + 1);
        package.assign(id, repository);

        self.packages_by_name
            .entry(package.name.clone())
            .or_default()
            .push(id);

        for link in package.replaces.iter().chain(package.provides.iter()) {
            let providers = self.providers.entry(link.target.clone()).or_default();
            if providers.last() != Some(&id) {
                providers.push(id);
            }
        }

        self.packages.push(package);
        id
    }

    /// Get a package by id
    pub fn package(&self, id: PackageId) -> Option<&Package> {
        let index = id.get().checked_sub(1)?;
        self.packages.get(index as usize)
    }

    /// All packages in insertion order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Ids of the packages with exactly this name
    pub fn packages_by_name(&self, name: &str) -> &[PackageId] {
        self.packages_by_name
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every candidate for a package name: packages with that name first,
    /// then packages replacing or providing it, each in insertion order.
    pub fn what_provides(&self, name: &str) -> Vec<PackageId> {
        let name = name.to_lowercase();
        let mut result: Vec<PackageId> = self.packages_by_name(&name).to_vec();

        if let Some(providers) = self.providers.get(&name) {
            for id in providers {
                if !result.contains(id) {
                    result.push(*id);
                }
            }
        }

        result
    }

    pub fn repository(&self, id: RepositoryId) -> Option<&Repository> {
        self.repositories.get(id.get() as usize)
    }

    pub fn repository_by_name(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|repo| repo.name() == name)
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Priority of a repository; repositories unknown to this pool rank 0
    pub fn priority_of(&self, id: RepositoryId) -> i32 {
        self.repository(id).map_or(0, Repository::priority)
    }

    /// Priority of the repository owning `package`
    pub fn package_priority<P: PackageInterface + ?Sized>(&self, package: &P) -> i32 {
        package.repository().map_or(0, |repo| self.priority_of(repo))
    }
}

/// Builder for creating pools
///
/// Repositories are ranked in registration order: the first one gets
/// priority 0, the next -1, and so on, unless a priority is given.
#[derive(Debug, Default)]
pub struct PoolBuilder {
    pool: Pool,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self { pool: Pool::new() }
    }

    /// Add a repository ranked below every repository added before it
    pub fn repository(self, name: &str, packages: impl IntoIterator<Item = Package>) -> Self {
        let priority = -(self.pool.repositories.len() as i32);
        self.repository_with_priority(name, priority, packages)
    }

    /// Add a repository with an explicit priority
    pub fn repository_with_priority(
        mut self,
        name: &str,
        priority: i32,
        packages: impl IntoIterator<Item = Package>,
    ) -> Self {
        let repository = self.pool.add_repository(name, priority);
        for package in packages {
            self.pool.insert_package(repository, package);
        }
        self
    }

    pub fn build(self) -> Pool {
        self.pool
    }
}
