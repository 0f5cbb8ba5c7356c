use std::path::Path;

/// The output file of a year selection: `{year}` in the pattern is replaced by
/// the label of the selection.
pub fn output_path(pattern: &str, label: &str) -> String {
    pattern.replace("{year}", label)
}

/// Relative paths of a config file are relative to the file itself.
pub fn resolve_path(root: Option<&Path>, path: &str) -> String {
    match root {
        Some(r) if Path::new(path).is_relative() => r.join(path).display().to_string(),
        _ => path.to_string(),
    }
}
