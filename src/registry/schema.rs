//! Registry wire types and boundary validators.
//!
//! The registry serves two resource shapes:
//!
//! - the **index**: a JSON array of [`IndexEntry`] objects whose `files` are plain
//!   relative path strings
//! - a **full item**: a single [`FullItem`] object whose `files` are
//!   [`FileRecord`] objects carrying literal content
//!
//! Both shapes are checked by an explicit validator ([`IndexValidator`],
//! [`ItemValidator`]) that returns a tagged [`Validation`] result instead of
//! failing. Only the strict client entry points turn an invalid result into an
//! error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Kind of a registry item or of one of its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A UI primitive (button, dialog, ...)
    #[serde(rename = "registry:ui")]
    Ui,
    /// A library module (helpers, utilities)
    #[serde(rename = "registry:lib")]
    Lib,
    /// A reusable hook
    #[serde(rename = "registry:hook")]
    Hook,
    /// A composite component
    #[serde(rename = "registry:component")]
    Component,
    /// A block made of several components
    #[serde(rename = "registry:block")]
    Block,
    /// A full page
    #[serde(rename = "registry:page")]
    Page,
    /// An arbitrary file with an explicit target
    #[serde(rename = "registry:file")]
    File,
    /// A style definition
    #[serde(rename = "registry:style")]
    Style,
    /// A theme definition
    #[serde(rename = "registry:theme")]
    Theme,
    /// Example usage of a component
    #[serde(rename = "registry:example")]
    Example,
    /// Internal registry item, not meant for direct installation
    #[serde(rename = "registry:internal")]
    Internal,
}

impl ItemKind {
    /// Wire representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "registry:ui",
            Self::Lib => "registry:lib",
            Self::Hook => "registry:hook",
            Self::Component => "registry:component",
            Self::Block => "registry:block",
            Self::Page => "registry:page",
            Self::File => "registry:file",
            Self::Style => "registry:style",
            Self::Theme => "registry:theme",
            Self::Example => "registry:example",
            Self::Internal => "registry:internal",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lightweight registry record from the index resource.
///
/// Lists the component's name, kind and dependency names, with file paths but no
/// file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Unique name within one index snapshot
    pub name: String,
    /// Item kind
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External runtime packages
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// External development packages
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
    /// Names of other registry items this one requires
    #[serde(default)]
    pub registry_dependencies: Vec<String>,
    /// Relative file paths (no content)
    #[serde(default)]
    pub files: Vec<String>,
}

/// A complete registry record including literal file content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullItem {
    /// Component name
    pub name: String,
    /// Item kind
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External runtime packages
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// External development packages
    #[serde(default)]
    pub dev_dependencies: Vec<String>,
    /// Names of other registry items this one requires
    #[serde(default)]
    pub registry_dependencies: Vec<String>,
    /// Files with content
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

/// One file of a [`FullItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the registry root
    pub path: String,
    /// File content, always text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// File kind, drives the destination directory
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Destination override relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Read access shared by [`IndexEntry`] and [`FullItem`].
///
/// Lets the resolver and dependency aggregation work over either record shape.
pub trait Component {
    /// Component name
    fn name(&self) -> &str;
    /// External runtime packages
    fn dependencies(&self) -> &[String];
    /// External development packages
    fn dev_dependencies(&self) -> &[String];
    /// Names of other registry items this one requires
    fn registry_dependencies(&self) -> &[String];
}

macro_rules! impl_component {
    ($($ty:ty),*) => {$(
        impl Component for $ty {
            fn name(&self) -> &str {
                &self.name
            }

            fn dependencies(&self) -> &[String] {
                &self.dependencies
            }

            fn dev_dependencies(&self) -> &[String] {
                &self.dev_dependencies
            }

            fn registry_dependencies(&self) -> &[String] {
                &self.registry_dependencies
            }
        }
    )*};
}

impl_component!(IndexEntry, FullItem);

/// Outcome of validating a fetched payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    /// The payload matches the schema
    Valid(T),
    /// The payload was rejected
    Invalid {
        /// Why the payload was rejected
        reason: String,
    },
}

impl<T> Validation<T> {
    /// Convert into a `Result`, keeping the rejection reason as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid {
                reason,
            } => Err(reason),
        }
    }

    /// Whether the payload was accepted.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Schema check for one registry resource shape.
pub trait SchemaValidator {
    /// Typed value produced on success
    type Output;

    /// Short resource label used in error messages.
    fn resource(&self) -> &'static str;

    /// Validate a decoded JSON payload.
    fn validate(&self, value: &Value) -> Validation<Self::Output>;
}

/// Validator for the index resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndexValidator;

impl SchemaValidator for IndexValidator {
    type Output = Vec<IndexEntry>;

    fn resource(&self) -> &'static str {
        "index"
    }

    fn validate(&self, value: &Value) -> Validation<Self::Output> {
        let Some(entries) = value.as_array() else {
            return Validation::Invalid {
                reason: "expected an array of entries".to_string(),
            };
        };

        let mut parsed = Vec::with_capacity(entries.len());
        let mut seen = HashSet::new();
        for (position, entry) in entries.iter().enumerate() {
            let entry: IndexEntry = match IndexEntry::deserialize(entry) {
                Ok(entry) => entry,
                Err(e) => {
                    return Validation::Invalid {
                        reason: format!("entry {position}: {e}"),
                    };
                }
            };
            if entry.name.trim().is_empty() {
                return Validation::Invalid {
                    reason: format!("entry {position}: empty name"),
                };
            }
            if !seen.insert(entry.name.clone()) {
                tracing::warn!("Registry index lists '{}' more than once", entry.name);
            }
            parsed.push(entry);
        }

        Validation::Valid(parsed)
    }
}

/// Validator for a per-component resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct ItemValidator;

impl SchemaValidator for ItemValidator {
    type Output = FullItem;

    fn resource(&self) -> &'static str {
        "item"
    }

    fn validate(&self, value: &Value) -> Validation<Self::Output> {
        if !value.is_object() {
            return Validation::Invalid {
                reason: "expected an object".to_string(),
            };
        }

        let item = match FullItem::deserialize(value) {
            Ok(item) => item,
            Err(e) => {
                return Validation::Invalid {
                    reason: e.to_string(),
                };
            }
        };

        if item.name.trim().is_empty() {
            return Validation::Invalid {
                reason: "empty name".to_string(),
            };
        }
        if let Some(file) = item.files.iter().find(|f| f.path.trim().is_empty()) {
            return Validation::Invalid {
                reason: format!("file of kind {} has an empty path", file.kind),
            };
        }

        Validation::Valid(item)
    }
}
