//! Transitive closure over `registryDependencies`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

use crate::registry::Component;

/// What happened to one name during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStep {
    /// The name was found and appended to the traversal
    Resolved {
        /// Resolved component
        name: String,
        /// Component that declared the dependency, `None` when requested directly
        required_by: Option<String>,
    },
    /// The name is not in the index and was skipped
    MissingReference {
        /// Unknown name
        name: String,
        /// Component that declared the dependency, `None` when requested directly
        required_by: Option<String>,
    },
    /// The name was already on the traversal path and was not entered again
    CycleBroken {
        /// Name that closes the cycle
        name: String,
        /// Traversal path at the point the back edge was found
        path: Vec<String>,
    },
}

impl fmt::Display for ResolutionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                name,
                required_by: None,
            } => write!(f, "resolved {name}"),
            Self::Resolved {
                name,
                required_by: Some(parent),
            } => write!(f, "resolved {name} (required by {parent})"),
            Self::MissingReference {
                name,
                required_by: None,
            } => write!(f, "missing {name}"),
            Self::MissingReference {
                name,
                required_by: Some(parent),
            } => write!(f, "missing {name} (required by {parent})"),
            Self::CycleBroken {
                name,
                path,
            } => write!(f, "cycle {} -> {name}", path.join(" -> ")),
        }
    }
}

/// Ordered components in which no name appears twice.
///
/// Only produced by [`resolve_tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSet<T> {
    items: Vec<T>,
}

impl<T: Component> ResolvedSet<T> {
    fn first_occurrences(traversal: Vec<T>) -> Self {
        let mut seen = HashSet::new();
        let items =
            traversal.into_iter().filter(|item| seen.insert(item.name().to_string())).collect();
        Self {
            items,
        }
    }

    /// Components in resolution order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Names in resolution order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(Component::name).collect()
    }

    /// Whether `name` was resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name() == name)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the components out, keeping resolution order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<'a, T> IntoIterator for &'a ResolvedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Result of [`resolve_tree`]: the resolved set plus a log of every step.
#[derive(Debug, Clone)]
pub struct Resolution<T> {
    /// Deduplicated components in resolution order
    pub items: ResolvedSet<T>,
    /// Every lookup made during traversal, in order
    pub steps: Vec<ResolutionStep>,
}

impl<T> Resolution<T> {
    /// Names that could not be found, with duplicates removed.
    pub fn missing(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .filter_map(|step| match step {
                ResolutionStep::MissingReference {
                    name,
                    ..
                } => Some(name.as_str()),
                _ => None,
            })
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Whether any circular dependency was cut.
    pub fn has_cycles(&self) -> bool {
        self.steps.iter().any(|step| matches!(step, ResolutionStep::CycleBroken { .. }))
    }
}

struct Walker<'a, T> {
    by_name: HashMap<&'a str, &'a T>,
    traversal: Vec<T>,
    steps: Vec<ResolutionStep>,
    path: Vec<String>,
}

impl<T: Component + Clone> Walker<'_, T> {
    fn visit(&mut self, name: &str, required_by: Option<&str>) {
        if self.path.iter().any(|on_path| on_path == name) {
            warn!("Circular registry dependency: {} -> {}", self.path.join(" -> "), name);
            self.steps.push(ResolutionStep::CycleBroken {
                name: name.to_string(),
                path: self.path.clone(),
            });
            return;
        }

        let Some(&entry) = self.by_name.get(name) else {
            match required_by {
                Some(parent) => {
                    warn!("Registry item '{}' (required by '{}') not found, skipping", name, parent)
                }
                None => warn!("Registry item '{}' not found, skipping", name),
            }
            self.steps.push(ResolutionStep::MissingReference {
                name: name.to_string(),
                required_by: required_by.map(str::to_string),
            });
            return;
        };

        debug!("Resolved '{}'", name);
        self.traversal.push(entry.clone());
        self.steps.push(ResolutionStep::Resolved {
            name: name.to_string(),
            required_by: required_by.map(str::to_string),
        });

        self.path.push(name.to_string());
        for dependency in entry.registry_dependencies() {
            self.visit(dependency, Some(name));
        }
        self.path.pop();
    }
}

/// Expand `requested` into every component reachable through
/// `registryDependencies`, each exactly once.
///
/// Never fails: unknown names and circular references are recorded in
/// [`Resolution::steps`] and skipped. When the index lists a name twice the
/// first entry wins.
///
/// # Examples
///
/// ```rust,no_run
/// use kitpm_cli::registry::IndexEntry;
/// use kitpm_cli::resolver::resolve_tree;
///
/// # fn example(index: Vec<IndexEntry>) {
/// let resolution = resolve_tree(&index, &["dialog"]);
/// for entry in &resolution.items {
///     println!("{}", entry.name);
/// }
/// # }
/// ```
pub fn resolve_tree<T, S>(index: &[T], requested: &[S]) -> Resolution<T>
where
    T: Component + Clone,
    S: AsRef<str>,
{
    let mut by_name = HashMap::with_capacity(index.len());
    for entry in index {
        by_name.entry(entry.name()).or_insert(entry);
    }

    let mut walker = Walker {
        by_name,
        traversal: Vec::new(),
        steps: Vec::new(),
        path: Vec::new(),
    };
    for name in requested {
        walker.visit(name.as_ref(), None);
    }

    Resolution {
        items: ResolvedSet::first_occurrences(walker.traversal),
        steps: walker.steps,
    }
}
