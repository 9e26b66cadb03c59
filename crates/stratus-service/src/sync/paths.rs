//! Canonical path derivation.
//!
//! Object keys are `/`-delimited flat strings; a trailing `/` marks an
//! explicit folder marker. The canonical path of a folder is the
//! `/`-joined chain of ancestor names from root to self with a trailing
//! `/`. Reconciliation and purge must agree on these rules, so they
//! both live here.

use std::collections::HashMap;

use uuid::Uuid;

/// Maximum folder nesting honored when walking parent chains. Parent
/// data is attacker-controlled; a cycle or runaway chain yields `None`
/// instead of looping.
pub const MAX_FOLDER_DEPTH: usize = 20;

/// Whether a key is an explicit folder marker.
pub fn is_folder_marker(key: &str) -> bool {
    key.ends_with('/')
}

/// Split a key into its non-empty path segments.
///
/// `"a/b/c"` → `["a", "b", "c"]`; `"a/b/"` → `["a", "b"]`.
pub fn segments_of(key: &str) -> Vec<&str> {
    key.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split a file key into its parent folder segments and file name.
///
/// Returns `None` for folder markers and empty keys.
pub fn split_file_key(key: &str) -> Option<(Vec<&str>, &str)> {
    if is_folder_marker(key) {
        return None;
    }
    let mut segments = segments_of(key);
    let name = segments.pop()?;
    Some((segments, name))
}

/// Every folder path implied by a key, shortest first.
///
/// For a file key these are the proper prefixes (`"a/b/c"` →
/// `["a/", "a/b/"]`); for a folder marker they include the marker's own
/// path (`"a/b/"` → `["a/", "a/b/"]`).
pub fn ancestor_paths_of(key: &str) -> Vec<String> {
    let segments = segments_of(key);
    let dirs: &[&str] = if is_folder_marker(key) {
        &segments
    } else {
        match segments.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    };

    let mut paths = Vec::with_capacity(dirs.len());
    let mut current = String::new();
    for segment in dirs {
        current.push_str(segment);
        current.push('/');
        paths.push(current.clone());
    }
    paths
}

/// Join folder names into a canonical path with trailing `/`.
pub fn path_from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for name in names {
        path.push_str(name);
        path.push('/');
    }
    path
}

/// Canonical path of a folder derived from a preloaded
/// `id -> (parent_id, name)` map.
///
/// Walks `parent_id` links iteratively up to [`MAX_FOLDER_DEPTH`].
/// A missing ancestor or a cycle makes the path unresolvable (`None`).
pub fn folder_path_of(folder_id: Uuid, folders: &HashMap<Uuid, (Option<Uuid>, String)>) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    let mut current = Some(folder_id);

    for _ in 0..=MAX_FOLDER_DEPTH {
        match current {
            None => {
                names.reverse();
                return Some(path_from_names(names));
            }
            Some(id) => {
                let (parent_id, name) = folders.get(&id)?;
                names.push(name.as_str());
                current = *parent_id;
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(entries: &[(Uuid, Option<Uuid>, &str)]) -> HashMap<Uuid, (Option<Uuid>, String)> {
        entries
            .iter()
            .map(|(id, parent, name)| (*id, (*parent, name.to_string())))
            .collect()
    }

    #[test]
    fn test_segments_of() {
        assert_eq!(segments_of("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(segments_of("a/b/"), vec!["a", "b"]);
        assert_eq!(segments_of("file.txt"), vec!["file.txt"]);
        assert!(segments_of("").is_empty());
        assert_eq!(segments_of("a//b"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_file_key() {
        let (parents, name) = split_file_key("a/b/c.txt").unwrap();
        assert_eq!(parents, vec!["a", "b"]);
        assert_eq!(name, "c.txt");

        let (parents, name) = split_file_key("root.txt").unwrap();
        assert!(parents.is_empty());
        assert_eq!(name, "root.txt");

        assert!(split_file_key("a/b/").is_none());
        assert!(split_file_key("").is_none());
    }

    #[test]
    fn test_ancestor_paths_of_file_key() {
        assert_eq!(ancestor_paths_of("a/b/c"), vec!["a/", "a/b/"]);
        assert!(ancestor_paths_of("root.txt").is_empty());
    }

    #[test]
    fn test_ancestor_paths_of_folder_marker() {
        assert_eq!(ancestor_paths_of("a/b/"), vec!["a/", "a/b/"]);
        assert_eq!(ancestor_paths_of("a/"), vec!["a/"]);
    }

    #[test]
    fn test_folder_path_of_walks_to_root() {
        let root = Uuid::new_v4();
        let child = Uuid::new_v4();
        let map = map_of(&[(root, None, "docs"), (child, Some(root), "reports")]);

        assert_eq!(folder_path_of(root, &map).unwrap(), "docs/");
        assert_eq!(folder_path_of(child, &map).unwrap(), "docs/reports/");
    }

    #[test]
    fn test_folder_path_of_missing_ancestor() {
        let orphan = Uuid::new_v4();
        let map = map_of(&[(orphan, Some(Uuid::new_v4()), "lost")]);
        assert!(folder_path_of(orphan, &map).is_none());
    }

    #[test]
    fn test_folder_path_of_cycle_terminates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let map = map_of(&[(a, Some(b), "a"), (b, Some(a), "b")]);
        assert!(folder_path_of(a, &map).is_none());
    }

    #[test]
    fn test_folder_path_of_depth_cap() {
        let mut entries = Vec::new();
        let mut parent = None;
        let mut last = Uuid::new_v4();
        for i in 0..=MAX_FOLDER_DEPTH {
            let id = Uuid::new_v4();
            entries.push((id, parent, format!("d{i}")));
            parent = Some(id);
            last = id;
        }
        let map: HashMap<_, _> = entries
            .iter()
            .map(|(id, p, n)| (*id, (*p, n.clone())))
            .collect();
        assert!(folder_path_of(last, &map).is_none());
    }
}
