use std::path::{Component, Path, PathBuf};

/// Resolve a caller-supplied path under the sounds root.
///
/// Only plain relative paths are accepted; absolute paths and `..`
/// components yield None.
pub fn resolve_sound_path(root: &Path, relative: &str) -> Option<PathBuf> {
    let candidate = Path::new(relative);
    if relative.trim().is_empty() {
        return None;
    }

    let escapes = candidate
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return None;
    }

    Some(root.join(candidate))
}
