use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Link, LinkType};
use crate::error::{PolicyError, Result};
use crate::repository::RepositoryId;

/// Identifier assigned to a package when it is added to a pool.
///
/// Ids start at 1 and follow insertion order; `0` means "not in a pool".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PackageId(u32);

impl PackageId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to the package attributes the policy works with
pub trait PackageInterface {
    /// Lowercase package name
    fn name(&self) -> &str;

    /// Normalized version
    fn version(&self) -> &str;

    /// Version as declared
    fn pretty_version(&self) -> &str;

    fn id(&self) -> PackageId;

    /// Owning repository, `None` until the package is added to a pool
    fn repository(&self) -> Option<RepositoryId>;

    fn replaces(&self) -> &[Link];

    fn provides(&self) -> &[Link];

    fn pretty_string(&self) -> String {
        format!("{} {}", self.name(), self.pretty_version())
    }
}

/// A package version offered by a repository
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PackageData", into = "PackageData")]
pub struct Package {
    /// Package name (lowercase)
    pub name: String,
    /// Package name as declared
    pub pretty_name: String,
    /// Normalized version
    pub version: String,
    /// Version as declared
    pub pretty_version: String,
    /// Replace links, in declaration order
    pub replaces: Vec<Link>,
    /// Provide links, in declaration order
    pub provides: Vec<Link>,
    id: PackageId,
    repository: Option<RepositoryId>,
}

impl Package {
    /// Create a package from an already normalized version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let pretty_name = name.into();
        let version = version.into();
        Self {
            name: pretty_name.to_lowercase(),
            pretty_name,
            pretty_version: version.clone(),
            version,
            replaces: Vec::new(),
            provides: Vec::new(),
            id: PackageId::default(),
            repository: None,
        }
    }

    pub fn with_pretty_version(mut self, pretty_version: impl Into<String>) -> Self {
        self.pretty_version = pretty_version.into();
        self
    }

    /// Declare that this package replaces `target` (any version when `constraint` is `None`)
    pub fn with_replace(mut self, target: &str, constraint: Option<&str>) -> Result<Self> {
        let link = Link::replace(&self.name, target, constraint)?;
        self.replaces.push(link);
        Ok(self)
    }

    /// Declare that this package provides `target`
    pub fn with_provide(mut self, target: &str, constraint: Option<&str>) -> Result<Self> {
        let link = Link::provide(&self.name, target, constraint)?;
        self.provides.push(link);
        Ok(self)
    }

    /// Parse a package from its JSON description
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn assign(&mut self, id: PackageId, repository: RepositoryId) {
        self.id = id;
        self.repository = Some(repository);
    }
}

impl PackageInterface for Package {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn pretty_version(&self) -> &str {
        &self.pretty_version
    }

    fn id(&self) -> PackageId {
        self.id
    }

    fn repository(&self) -> Option<RepositoryId> {
        self.repository
    }

    fn replaces(&self) -> &[Link] {
        &self.replaces
    }

    fn provides(&self) -> &[Link] {
        &self.provides
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pretty_name, self.pretty_version)
    }
}

/// Serialized form of a package, following composer.json field names
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PackageData {
    name: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version_normalized: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    replace: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    provide: IndexMap<String, String>,
}

impl TryFrom<PackageData> for Package {
    type Error = PolicyError;

    fn try_from(data: PackageData) -> Result<Self> {
        let version = data.version_normalized.unwrap_or_else(|| data.version.clone());
        let mut package = Package::new(data.name, version).with_pretty_version(data.version);

        for (target, constraint) in &data.replace {
            package = package.with_replace(target, Some(constraint.as_str()))?;
        }
        for (target, constraint) in &data.provide {
            package = package.with_provide(target, Some(constraint.as_str()))?;
        }

        Ok(package)
    }
}

impl From<Package> for PackageData {
    fn from(package: Package) -> Self {
        let links = |links: &[Link]| -> IndexMap<String, String> {
            links
                .iter()
                .map(|link| (link.target.clone(), link.pretty_constraint().to_string()))
                .collect()
        };
        let replace = links(&package.replaces);
        let provide = links(&package.provides);
        let version_normalized = (package.version != package.pretty_version).then(|| package.version.clone());

        PackageData {
            name: package.pretty_name,
            version: package.pretty_version,
            version_normalized,
            replace,
            provide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_new() {
        let pkg = Package::new("Vendor/Package", "1.0.0.0");
        assert_eq!(pkg.name, "vendor/package");
        assert_eq!(pkg.pretty_name, "Vendor/Package");
        assert_eq!(pkg.version, "1.0.0.0");
        assert_eq!(pkg.pretty_version, "1.0.0.0");
        assert_eq!(pkg.id(), PackageId::default());
        assert_eq!(pkg.repository(), None);
    }

    #[test]
    fn test_package_links() {
        let pkg = Package::new("mysql-client", "1.0")
            .with_replace("mysql", Some("== 5.0"))
            .unwrap()
            .with_provide("mysql-implementation", None)
            .unwrap();

        assert_eq!(pkg.replaces().len(), 1);
        assert_eq!(pkg.replaces()[0].source, "mysql-client");
        assert_eq!(pkg.replaces()[0].target, "mysql");
        assert_eq!(pkg.provides()[0].link_type, LinkType::Provide);
    }

    #[test]
    fn test_package_from_json() {
        let json = r#"{
            "name": "Acme/Mailer",
            "version": "v2.1.0",
            "version_normalized": "2.1.0.0",
            "replace": {"acme/legacy-mailer": "*", "acme/smtp": "== 1.0.0.0"},
            "provide": {"psr/mail-implementation": "1.0.0.0"}
        }"#;
        let pkg = Package::from_json(json).unwrap();

        assert_eq!(pkg.name, "acme/mailer");
        assert_eq!(pkg.version, "2.1.0.0");
        assert_eq!(pkg.pretty_version, "v2.1.0");
        assert_eq!(pkg.replaces.len(), 2);
        assert_eq!(pkg.replaces[0].target, "acme/legacy-mailer");
        assert_eq!(pkg.replaces[1].target, "acme/smtp");
        assert!(pkg.replaces[1].matches_version("1.0.0.0"));
        assert_eq!(pkg.provides.len(), 1);
        assert_eq!(pkg.to_string(), "Acme/Mailer v2.1.0");
    }

    #[test]
    fn test_package_from_json_invalid_constraint() {
        let json = r#"{"name": "a", "version": "1.0", "replace": {"b": "1.0 ||"}}"#;
        let err = Package::from_json(json).unwrap_err();
        assert!(err.to_string().contains("trailing operator"));
    }

    #[test]
    fn test_package_serialize() {
        let pkg = Package::new("a", "1.0.0.0")
            .with_pretty_version("1.0.0")
            .with_replace("b", None)
            .unwrap();
        let value = serde_json::to_value(&pkg).unwrap();

        assert_eq!(value["name"], "a");
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["version_normalized"], "1.0.0.0");
        assert_eq!(value["replace"]["b"], "*");
        assert!(value.get("provide").is_none());
    }
}
