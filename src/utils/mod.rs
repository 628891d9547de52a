//! Utility functions

use std::path::Path;

/// Render a path relative to the scan root with `/` separators.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lowercased extension with its leading dot (`"src/App.JS"` → `".js"`).
pub fn dotted_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Size in MiB rounded to two decimals (3 MiB → "3.00").
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

/// Format a number with thousands separators (e.g. 1048576 → "1,048,576").
pub fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_and_dotted() {
        assert_eq!(dotted_extension("src/App.JS"), ".js");
        assert_eq!(dotted_extension("Makefile"), "");
        assert_eq!(dotted_extension("archive.tar.gz"), ".gz");
    }

    #[test]
    fn mib_rounds_to_two_decimals() {
        assert_eq!(format_mib(3 * 1024 * 1024), "3.00");
        assert_eq!(format_mib(2_621_440), "2.50");
    }

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_048_576), "1,048,576");
    }
}
