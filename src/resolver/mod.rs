//! Dependency resolution for registry components.
//!
//! Components declare the other registry items they need through
//! `registryDependencies`. Installing one component therefore means installing
//! the transitive closure of those declarations. This module expands a list of
//! requested names into that closure against an in-memory index.
//!
//! # Algorithm
//!
//! [`resolve_tree`] walks depth-first over the requested names in order, then
//! over each entry's declared dependencies in the order the index lists them:
//!
//! 1. Look up the entry by exact name. Unknown names are logged, recorded as
//!    [`ResolutionStep::MissingReference`] and skipped; resolution continues.
//! 2. Append the entry, then resolve its `registryDependencies` the same way,
//!    appending the results right after it.
//! 3. Once the full traversal is built, keep only the first occurrence of each
//!    name.
//!
//! A component reachable both directly and transitively therefore ends up at the
//! position of its first appearance in traversal order.
//!
//! # Cycles
//!
//! A dependency that is already on the current traversal path is not entered
//! again. The back edge is logged and recorded as
//! [`ResolutionStep::CycleBroken`], so a circular `registryDependencies`
//! declaration never recurses without bound.
//!
//! # External Packages
//!
//! [`ExternalDependencies::collect`] unions the `dependencies` and
//! `devDependencies` of a resolved set for the package installer.

mod external;
mod tree;

#[cfg(test)]
mod tests;

pub use external::ExternalDependencies;
pub use tree::{Resolution, ResolutionStep, ResolvedSet, resolve_tree};
