//! Aggregation of external package requirements.

use std::collections::BTreeSet;

use crate::registry::Component;

/// Union of the external packages declared by a set of components.
///
/// Set semantics: each package appears once, sorted by name. A package listed
/// as both a runtime and a development dependency stays in both sets; the
/// package installer decides how to treat it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalDependencies {
    /// Runtime packages
    pub dependencies: BTreeSet<String>,
    /// Development packages
    pub dev_dependencies: BTreeSet<String>,
}

impl ExternalDependencies {
    /// Collect the packages of every component in `items`.
    pub fn collect<'a, T, I>(items: I) -> Self
    where
        T: Component + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut deps = Self::default();
        for item in items {
            deps.dependencies.extend(item.dependencies().iter().cloned());
            deps.dev_dependencies.extend(item.dev_dependencies().iter().cloned());
        }
        deps
    }

    /// Whether no package is required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty() && self.dev_dependencies.is_empty()
    }
}
