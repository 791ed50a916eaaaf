//! Import-name to distribution-name resolution.
//!
//! A pure lookup over a static table of well-known renames; names absent
//! from the table resolve to themselves. The table is data-driven: callers
//! can extend or correct it with `with_overrides` without touching code.
//! No versions are pinned here — pinning is caller policy.

use std::collections::HashMap;

/// Import names whose installable distribution is spelled differently.
const DIST_RENAMES: &[(&str, &str)] = &[
    ("cv2", "opencv-python"),
    ("PIL", "Pillow"),
    ("sklearn", "scikit-learn"),
    ("yaml", "PyYAML"),
    ("bs4", "beautifulsoup4"),
    ("jwt", "PyJWT"),
    ("dateutil", "python-dateutil"),
    ("dotenv", "python-dotenv"),
    ("psycopg2", "psycopg2-binary"),
    ("gym", "gymnasium"),
    ("stable_baselines3", "stable-baselines3"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("sqlalchemy", "SQLAlchemy"),
];

/// A raw extracted name paired with its installable distribution name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub raw: String,
    pub resolved: String,
}

/// Maps raw import names to installable package names.
/// Immutable after construction; resolution is referentially transparent.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    table: HashMap<String, String>,
}

impl Default for PackageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageResolver {
    /// Resolver seeded with the built-in rename table.
    pub fn new() -> Self {
        let table = DIST_RENAMES
            .iter()
            .map(|(import, dist)| (import.to_string(), dist.to_string()))
            .collect();
        Self { table }
    }

    /// Extend or replace table entries. Later entries win.
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.table.extend(overrides);
        self
    }

    /// Resolve one raw name. Unknown names pass through unchanged.
    pub fn resolve(&self, raw: &str) -> String {
        self.table
            .get(raw)
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    /// Resolve a dependency set, collapsing duplicates by resolved name
    /// while preserving first-seen order.
    pub fn resolve_all(&self, raws: &[String]) -> Vec<ResolvedPackage> {
        let mut seen = std::collections::HashSet::new();
        raws.iter()
            .map(|raw| ResolvedPackage {
                raw: raw.clone(),
                resolved: self.resolve(raw),
            })
            .filter(|pkg| seen.insert(pkg.resolved.clone()))
            .collect()
    }
}
