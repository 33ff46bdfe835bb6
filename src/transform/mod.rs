//! TypeScript to JavaScript conversion for projects that do not use static typing.
//!
//! Registry templates are authored in TypeScript/TSX. When the project config
//! has `tsx: false`, each file goes through a [`SourceTransformer`] before it is
//! written. The default implementation, [`TypeStripper`], removes type-only
//! syntax in place and leaves everything else byte-for-byte intact:
//!
//! - annotations on variables, parameters, return types and class members
//! - `as` / `satisfies` expressions, non-null `!`, optional `?` markers
//! - type parameters and type arguments (including on calls and JSX tags)
//! - `interface`, `type` aliases, `declare` statements and function overloads
//! - `import type` / `export type` and inline `type` specifiers
//! - `abstract`, `declare`, access and `readonly`/`override` modifiers,
//!   `implements` clauses, index signatures and `this` parameters
//!
//! `enum` declarations are lowered to the IIFE form `tsc` emits. JSX is kept.
//!
//! # Failure Behavior
//!
//! The transformer never fails. Input it cannot parse, or TypeScript whose
//! JavaScript form needs more than removal (parameter properties, runtime
//! namespaces, `import x = require()`, `export =`), comes back unchanged.
//!
//! Stripping is a fixed point: transforming already-stripped output returns it
//! unchanged.

mod edits;
mod enums;
mod error;
mod expr;
mod jsx;
mod lexer;
mod strip;
mod types;


use std::path::{Path, PathBuf};
use tracing::debug;

pub use error::StripError;

/// Converts component source for a project's typing preference.
pub trait SourceTransformer: Send + Sync {
    /// Return `source` ready to write into the project.
    ///
    /// With `wants_static_typing` the source is returned unchanged.
    fn transform(&self, source: &str, wants_static_typing: bool) -> String;
}

/// [`SourceTransformer`] that strips TypeScript syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeStripper;

impl SourceTransformer for TypeStripper {
    fn transform(&self, source: &str, wants_static_typing: bool) -> String {
        transform(source, wants_static_typing)
    }
}

/// Strip type syntax from `source` unless the project wants static typing.
///
/// Empty or whitespace-only input is returned as is, and so is anything
/// [`try_strip`] rejects.
///
/// # Examples
///
/// ```
/// use kitpm_cli::transform::transform;
///
/// let js = transform("let count: number = 0;", false);
/// assert_eq!(js, "let count = 0;");
///
/// let ts = transform("let count: number = 0;", true);
/// assert_eq!(ts, "let count: number = 0;");
/// ```
pub fn transform(source: &str, wants_static_typing: bool) -> String {
    if wants_static_typing || source.trim().is_empty() {
        return source.to_string();
    }
    match try_strip(source) {
        Ok(stripped) => stripped,
        Err(e) => {
            debug!("Keeping source unchanged, type stripping failed: {}", e);
            source.to_string()
        }
    }
}

/// Strip type syntax, reporting why when the source cannot be handled.
pub fn try_strip(source: &str) -> Result<String, StripError> {
    strip::strip(source)
}

/// Whether `path` is a TypeScript declaration file (`*.d.ts`).
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with(".d.ts"))
}

/// Where a registry file lands in a project without static typing.
///
/// `.tsx` becomes `.jsx`, `.ts` becomes `.js`, any other extension is kept.
/// Declaration files have no runtime form and yield `None`.
pub fn untyped_path(path: &Path) -> Option<PathBuf> {
    if is_declaration_file(path) {
        return None;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some("tsx") => Some(path.with_extension("jsx")),
        Some("ts") => Some(path.with_extension("js")),
        _ => Some(path.to_path_buf()),
    }
}
