use std::path::{Path, PathBuf};

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and a leading `~`. Unresolvable input is
/// returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Expand a path and, if still relative, anchor it at `base`.
pub fn resolve_path(path: &Path, base: Option<&Path>) -> PathBuf {
    let expanded = PathBuf::from(expand_env_vars(path.to_string_lossy().as_ref()));
    match base {
        Some(base) if expanded.is_relative() => base.join(expanded),
        _ => expanded,
    }
}
