//! Shared path manipulation utilities.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` when relative, then normalize `.`/`..`
/// syntactically. The filesystem is not consulted.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize_syntactic(&joined)
}

/// Whether `relative` names something strictly below its base directory.
///
/// Rejects empty strings, absolute paths, and any `..` component, so that
/// `base.join(relative)` can never point at `base` itself or outside it.
pub fn is_contained_relative(relative: &str) -> bool {
    let path = Path::new(relative);
    let mut saw_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => saw_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    saw_normal
}

fn normalize_syntactic(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir | Component::Normal(_) => {
                components.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
        }
    }
    components.into_iter().collect()
}
