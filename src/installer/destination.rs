//! Mapping of registry files to project paths.

use std::path::{Component, Path, PathBuf};

use super::SkipReason;
use crate::config::{ProjectConfig, ProjectPaths};
use crate::registry::{FileRecord, ItemKind};
use crate::transform::{is_declaration_file, untyped_path};

/// Where one registry file goes and whether it needs type stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Absolute path of the file to write
    pub path: PathBuf,
    /// The content is TypeScript that must be converted before writing
    pub strip_types: bool,
}

/// Compute the destination of `file`, or the reason it must not be installed.
///
/// An explicit `target` is taken relative to the project root (a leading `~/`
/// is accepted) and may not leave it. Otherwise the file kind picks the alias
/// directory and the registry path's last segment is the file name. Projects
/// without static typing get `.js`/`.jsx` names and never receive declaration
/// files.
pub fn destination_for(
    file: &FileRecord,
    config: &ProjectConfig,
    paths: &ProjectPaths,
) -> Result<Destination, SkipReason> {
    let path = match file.target.as_deref().filter(|t| !t.trim().is_empty()) {
        Some(target) => join_relative(&paths.root, target.trim_start_matches("~/")),
        None => file_name(&file.path).map(|name| kind_directory(file.kind, paths).join(name)),
    }
    .ok_or(SkipReason::InvalidPath)?;

    if config.tsx {
        return Ok(Destination {
            path,
            strip_types: false,
        });
    }

    if is_declaration_file(&path) {
        return Err(SkipReason::DeclarationFile);
    }
    let strip_types = is_typed_script(&path);
    untyped_path(&path)
        .map(|path| Destination {
            path,
            strip_types,
        })
        .ok_or(SkipReason::DeclarationFile)
}

fn kind_directory(kind: ItemKind, paths: &ProjectPaths) -> &Path {
    match kind {
        ItemKind::Ui => &paths.ui,
        ItemKind::Lib => &paths.lib,
        ItemKind::Hook => &paths.hooks,
        _ => &paths.components,
    }
}

fn file_name(registry_path: &str) -> Option<&str> {
    registry_path
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .filter(|segment| is_plain_segment(segment))
}

/// Join `relative` onto `base`, refusing any segment that is not a plain name
/// (`..`, drive prefixes, roots).
fn join_relative(base: &Path, relative: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    let mut joined = false;
    for segment in relative.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".") {
        if !is_plain_segment(segment) {
            return None;
        }
        path.push(segment);
        joined = true;
    }
    joined.then_some(path)
}

fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn is_typed_script(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("ts" | "tsx"))
}
