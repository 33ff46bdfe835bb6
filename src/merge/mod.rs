//! Idempotent injection of the shared helper export into a user-owned file.
//!
//! Many components import a small class-name helper (`cn`) from the project's
//! `lib/utils` file. That file usually already exists and belongs to the user,
//! so it is never overwritten. Instead the helper template is merged in:
//!
//! 1. A missing file is created with the template verbatim.
//! 2. A file that already exports the helper is left byte-for-byte unchanged.
//! 3. Otherwise the template's `import` statements are prepended (skipping any
//!    the file already contains verbatim) and the rest of the template is
//!    appended after one blank line.
//!
//! After any of these, merging the same template again changes nothing.
//!
//! # Limitations
//!
//! Import deduplication is textual: `import { clsx } from "clsx"` and
//! `import {clsx} from 'clsx'` are different imports as far as the merger is
//! concerned, and the second one would be added.

use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::constants::HELPER_EXPORT_NAME;
use crate::utils::fs::{read_text_if_exists, safe_write};

/// Top-level import statements, including ones spanning several lines.
static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^import\s[\s\S]*?["'][^"'\n]+["'];?[ \t]*$"#)
        .unwrap_or_else(|e| unreachable!("import regex is valid: {e}"))
});

/// Failure while reading or writing the merge target.
#[derive(Error, Debug)]
pub enum MergeError {
    /// Filesystem operation on the target failed
    #[error("Failed to merge into {}: {source}", path.display())]
    Io {
        /// File being merged into
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

/// What [`HelperMerger::merge_into`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The file did not exist and was created from the template
    Created,
    /// Imports and helper code were added to an existing file
    Merged,
    /// The file already exported the helper; nothing was written
    AlreadyPresent,
}

/// Merges a helper template into an existing file, keyed by export name.
#[derive(Debug, Clone)]
pub struct HelperMerger {
    export_name: String,
    export_pattern: Regex,
}

impl Default for HelperMerger {
    fn default() -> Self {
        Self::new(HELPER_EXPORT_NAME)
    }
}

impl HelperMerger {
    /// Create a merger that looks for `export function <name>` or
    /// `export const <name>`.
    pub fn new(export_name: &str) -> Self {
        let pattern = format!(
            r"(?m)^export\s+(?:async\s+)?(?:function\s*\*?\s*|const\s+){}\b",
            regex::escape(export_name)
        );
        let export_pattern =
            Regex::new(&pattern).unwrap_or_else(|e| unreachable!("escaped pattern is valid: {e}"));
        Self {
            export_name: export_name.to_string(),
            export_pattern,
        }
    }

    /// The export this merger looks for.
    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    /// Whether `text` declares the helper export at the start of a line.
    pub fn declares_export(&self, text: &str) -> bool {
        self.export_pattern.is_match(text)
    }

    /// Whether the file at `path` exists and already declares the helper.
    ///
    /// Unreadable files count as not declaring it.
    pub async fn has_target_export(&self, path: &Path) -> bool {
        match read_text_if_exists(path).await {
            Ok(Some(text)) => self.declares_export(&text),
            _ => false,
        }
    }

    /// Merge `template` into the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MergeError::Io`] if the file cannot be read or written.
    pub async fn merge_into(
        &self,
        path: &Path,
        template: &str,
    ) -> Result<MergeOutcome, MergeError> {
        let io_error = |source| MergeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let Some(existing) = read_text_if_exists(path).await.map_err(io_error)? else {
            safe_write(path, template).await.map_err(io_error)?;
            info!("Created {}", path.display());
            return Ok(MergeOutcome::Created);
        };

        if self.declares_export(&existing) {
            debug!(
                "{} already exports '{}', leaving it unchanged",
                path.display(),
                self.export_name
            );
            return Ok(MergeOutcome::AlreadyPresent);
        }

        let merged = merge_text(&existing, template);
        safe_write(path, &merged).await.map_err(io_error)?;
        info!("Merged '{}' into {}", self.export_name, path.display());
        Ok(MergeOutcome::Merged)
    }
}

/// Combine an existing file with a helper template.
fn merge_text(existing: &str, template: &str) -> String {
    let imports: Vec<&str> =
        IMPORT_STATEMENT.find_iter(template).map(|m| m.as_str().trim()).collect();
    let payload = IMPORT_STATEMENT.replace_all(template, "");
    let payload = payload.trim();

    let mut content = existing.to_string();
    for import in imports {
        if !content.contains(import) {
            content = format!("{import}\n{content}");
        }
    }

    let head = content.trim_end();
    if head.is_empty() {
        format!("{payload}\n")
    } else {
        format!("{head}\n\n{payload}\n")
    }
}
