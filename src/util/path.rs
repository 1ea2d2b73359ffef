//! Path helpers

/// Use `/` as separator regardless of platform.
pub fn normalize_path_separator(s: &str) -> String {
    s.replace('\\', "/")
}
