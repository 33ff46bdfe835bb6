//! Error handling for kitpm
//!
//! Each module reports failures through its own `thiserror` enum
//! ([`RegistryError`], [`MergeError`]). This module ties them together:
//!
//! - [`KitError`] - crate-wide error type that wraps the module errors and adds
//!   the failures only the application layer can produce
//! - [`ErrorContext`] - wrapper adding a suggestion and details for CLI users
//! - [`user_friendly_error`] - turns any [`anyhow::Error`] into an
//!   [`ErrorContext`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use kitpm_cli::core::{KitError, user_friendly_error};
//!
//! let error = KitError::UnknownComponent {
//!     name: "buton".to_string(),
//!     suggestions: vec!["button".to_string()],
//! };
//! user_friendly_error(anyhow::Error::from(error)).display();
//! ```

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::merge::MergeError;
use crate::registry::RegistryError;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum KitError {
    /// Registry request failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Helper merge failed
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A component file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// `components.json` could not be read or parsed
    #[error("Invalid project config {}: {reason}", path.display())]
    ProjectConfig {
        /// Path of the config file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A name the user asked for is not in the registry index
    #[error("Component '{name}' is not in the registry")]
    UnknownComponent {
        /// The unknown name
        name: String,
        /// Similar names from the index
        suggestions: Vec<String>,
    },

    /// Anything else, already formatted
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// A [`KitError`] with an optional suggestion and details for display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: KitError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Background on why it happened
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap `error` without suggestion or details.
    #[must_use]
    pub const fn new(error: KitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Names from `candidates` close enough to `name` to be a likely typo.
///
/// Uses Jaro-Winkler similarity, best match first, at most three.
pub fn similar_names<'a, I>(name: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| (strsim::jaro_winkler(name, candidate), candidate))
        .filter(|(score, _)| *score >= 0.8)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().take(3).map(|(_, candidate)| candidate.to_string()).collect()
}

/// Convert any error into an [`ErrorContext`] with a fitting suggestion.
///
/// [`KitError`] and the module errors it wraps get tailored advice. Anything
/// else is shown with its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<KitError>() {
        Ok(kit_error) => return create_error_context(kit_error),
        Err(error) => error,
    };
    let error = match error.downcast::<RegistryError>() {
        Ok(registry_error) => return create_error_context(KitError::Registry(registry_error)),
        Err(error) => error,
    };
    let error = match error.downcast::<MergeError>() {
        Ok(merge_error) => return create_error_context(KitError::Merge(merge_error)),
        Err(error) => error,
    };

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(KitError::Other {
        message,
    })
}

fn create_error_context(error: KitError) -> ErrorContext {
    let (suggestion, details): (Option<String>, Option<&str>) = match &error {
        KitError::Registry(registry_error) => match registry_error {
            RegistryError::Unauthorized { .. } | RegistryError::Forbidden { .. } => (
                Some("Check that the registry is public or that your credentials are valid".into()),
                Some("The registry refused the request"),
            ),
            RegistryError::NotFound { .. } => (
                Some("Run 'kitpm list' to see the available components".into()),
                None,
            ),
            RegistryError::Timeout { .. } | RegistryError::Network { .. } => (
                Some(
                    "Check your internet connection, or set HTTPS_PROXY if you are behind a proxy"
                        .into(),
                ),
                Some("Registry requests are aborted after 10 seconds"),
            ),
            RegistryError::Transport { .. } => (
                Some("The registry may be temporarily unavailable; try again later".into()),
                None,
            ),
            RegistryError::Parse { .. } | RegistryError::Validation { .. } => (
                Some("Check that REGISTRY_URL points at a component registry".into()),
                Some("The registry answered with data kitpm does not understand"),
            ),
        },
        KitError::Merge(_) | KitError::FileWrite { .. } => (
            Some("Check that the project directory exists and is writable".into()),
            None,
        ),
        KitError::ProjectConfig { .. } => (
            Some(
                "Fix the JSON syntax in components.json or delete the file to use defaults".into(),
            ),
            None,
        ),
        KitError::UnknownComponent {
            suggestions,
            ..
        } => (
            Some(if suggestions.is_empty() {
                "Run 'kitpm list' to see the available components".to_string()
            } else {
                format!("Did you mean {}?", quoted_list(suggestions))
            }),
            None,
        ),
        KitError::Other { .. } => (None, None),
    };

    let mut context = ErrorContext::new(error);
    if let Some(suggestion) = suggestion {
        context = context.with_suggestion(suggestion);
    }
    if let Some(details) = details {
        context = context.with_details(details);
    }
    context
}

fn quoted_list(names: &[String]) -> String {
    names.iter().map(|n| format!("'{n}'")).collect::<Vec<_>>().join(" or ")
}
