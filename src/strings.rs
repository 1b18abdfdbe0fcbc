// String manipulation utilities

/// Final `/`-separated component of a path
///
/// Examples:
/// - "/home/user/a.svg" -> "a.svg"
/// - "a.svg" -> "a.svg"
/// - "/home/user/" -> ""
///
/// Borrows from the input, no allocation
#[inline]
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Whether `line` carries the marker token anywhere
#[inline]
pub fn has_marker(line: &str, marker: &str) -> bool {
    line.contains(marker)
}

/// Remove every occurrence of `marker` from `line`
///
/// Not anchored: `"a firefox b"` loses its marker too.
pub fn strip_marker(line: &str, marker: &str) -> String {
    if marker.is_empty() {
        return line.to_string();
    }
    line.replace(marker, "")
}
