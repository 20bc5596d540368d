//! Remote path helpers for recursive directory creation

/// Split a remote path on `/` into its non-empty segments
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|seg| !seg.is_empty()).collect()
}

/// Cumulative absolute prefixes of a path, shallowest first:
/// `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`
pub(crate) fn cumulative_prefixes(path: &str) -> Vec<String> {
    let mut prefixes = Vec::new();
    let mut current = String::new();
    for seg in split_path(path) {
        current.push('/');
        current.push_str(seg);
        prefixes.push(current.clone());
    }
    prefixes
}
