//! Maps import specifiers to canonical paths within the analyzed file set.

use std::collections::HashSet;

/// Extensions tried when a candidate has no exact match, in order.
const EXTENSIONS: [&str; 6] = [".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs"];

/// Index-file forms tried after the extension list, in order.
const INDEX_FILES: [&str; 6] = [
    "/index.js",
    "/index.ts",
    "/index.jsx",
    "/index.tsx",
    "/index.mjs",
    "/index.cjs",
];

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The specifier names a file in the analyzed set.
    Resolved(String),
    /// A bare specifier — an external package, not part of the set.
    External,
    /// A local-looking specifier that matched nothing; worth a diagnostic.
    Unresolved,
}

/// Resolve `specifier` as written in `current_path` against the set of
/// known root-relative paths.
///
/// Dispatch by specifier shape: alias prefix, then relative, then absolute;
/// anything else is assumed to be an external package and resolution stops
/// immediately. A produced candidate is matched exactly, then with each
/// extension, then with each index form, and finally retried without its
/// first path segment (aliases sometimes include a root directory the
/// fetched tree does not).
pub fn resolve(
    current_path: &str,
    specifier: &str,
    known_paths: &HashSet<String>,
    alias_prefix: &str,
) -> Resolution {
    let candidate = if !alias_prefix.is_empty() && specifier.starts_with(alias_prefix) {
        specifier[alias_prefix.len()..].to_string()
    } else if specifier.starts_with('.') {
        resolve_relative(current_path, specifier)
    } else if let Some(rest) = specifier.strip_prefix('/') {
        rest.to_string()
    } else {
        return Resolution::External;
    };

    match match_candidate(&candidate, known_paths) {
        Some(path) => Resolution::Resolved(path),
        None => Resolution::Unresolved,
    }
}

/// Collapse `.`/`..` segments against the directory of `current_path`.
fn resolve_relative(current_path: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = current_path.split('/').filter(|s| !s.is_empty()).collect();
    // Drop the file name, keep its directory.
    segments.pop();

    for part in specifier.split('/') {
        match part {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            _ => segments.push(part),
        }
    }

    segments.join("/")
}

fn match_candidate(candidate: &str, known_paths: &HashSet<String>) -> Option<String> {
    if known_paths.contains(candidate) {
        return Some(candidate.to_string());
    }

    for ext in EXTENSIONS {
        let with_ext = format!("{candidate}{ext}");
        if known_paths.contains(&with_ext) {
            return Some(with_ext);
        }
    }

    for index in INDEX_FILES {
        let with_index = format!("{candidate}{index}");
        if known_paths.contains(&with_index) {
            return Some(with_index);
        }
    }

    // Common mismatch between import aliasing and the fetched tree's root:
    // retry without the first path segment.
    if let Some((_, rest)) = candidate.split_once('/') {
        if known_paths.contains(rest) {
            return Some(rest.to_string());
        }
        for ext in EXTENSIONS {
            let with_ext = format!("{rest}{ext}");
            if known_paths.contains(&with_ext) {
                return Some(with_ext);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(paths: &[&str]) -> HashSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn relative_import_resolves_against_current_directory() {
        let paths = known(&["src/a.ts", "src/foo.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./foo", &paths, "@/"),
            Resolution::Resolved("src/foo.ts".into())
        );
    }

    #[test]
    fn parent_segments_pop_directories() {
        let paths = known(&["src/components/Button.tsx", "src/lib/util.ts"]);
        assert_eq!(
            resolve("src/components/Button.tsx", "../lib/util", &paths, "@/"),
            Resolution::Resolved("src/lib/util.ts".into())
        );
    }

    #[test]
    fn alias_prefix_maps_to_repo_root() {
        let paths = known(&["lib/bar.ts"]);
        assert_eq!(
            resolve("src/a.ts", "@/lib/bar", &paths, "@/"),
            Resolution::Resolved("lib/bar.ts".into())
        );
    }

    #[test]
    fn absolute_specifier_strips_leading_slash() {
        let paths = known(&["lib/config.js"]);
        assert_eq!(
            resolve("src/a.ts", "/lib/config.js", &paths, "@/"),
            Resolution::Resolved("lib/config.js".into())
        );
    }

    #[test]
    fn bare_specifier_is_external_without_matching() {
        // "react" would even match a local file name, but bare specifiers
        // stop before any matching is attempted.
        let paths = known(&["react.ts", "src/a.ts"]);
        assert_eq!(resolve("src/a.ts", "react", &paths, "@/"), Resolution::External);
        assert_eq!(
            resolve("src/a.ts", "next/link", &paths, "@/"),
            Resolution::External
        );
    }

    #[test]
    fn extension_fallback_respects_order() {
        // Both .js and .ts exist; .js is tried first.
        let paths = known(&["src/foo.js", "src/foo.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./foo", &paths, "@/"),
            Resolution::Resolved("src/foo.js".into())
        );
    }

    #[test]
    fn index_files_tried_after_extensions() {
        let paths = known(&["src/lib/index.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./lib", &paths, "@/"),
            Resolution::Resolved("src/lib/index.ts".into())
        );
    }

    #[test]
    fn first_segment_dropped_on_root_mismatch() {
        // Import says "src/lib/bar" but the fetched tree is rooted below src.
        let paths = known(&["lib/bar.ts"]);
        assert_eq!(
            resolve("a.ts", "./src/lib/bar", &paths, "@/"),
            Resolution::Resolved("lib/bar.ts".into())
        );
    }

    #[test]
    fn missing_local_file_is_unresolved() {
        let paths = known(&["src/a.ts"]);
        assert_eq!(
            resolve("src/a.ts", "./does-not-exist", &paths, "@/"),
            Resolution::Unresolved
        );
    }

    #[test]
    fn exact_match_wins_before_extensions() {
        let paths = known(&["src/foo.ts", "src/foo.ts.js"]);
        assert_eq!(
            resolve("src/a.ts", "./foo.ts", &paths, "@/"),
            Resolution::Resolved("src/foo.ts".into())
        );
    }
}
