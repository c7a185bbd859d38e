mod link;
mod package;

pub use link::{Link, LinkType};
pub use package::{Package, PackageId, PackageInterface};
