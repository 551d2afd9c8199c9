//! Track database browser state.
//!
//! Holds the flat uri list the daemon reports and the set of folders the
//! user has expanded, both as explicit data rather than something scraped
//! back out of the rendered tree. The expanded set is persisted through
//! the snapshot [`Store`] so it survives reloads; persistence failures
//! degrade to collapsed folders.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use crate::{protocol::Command, store::Store};

/// Snapshot cache key for the expanded-folder map.
pub const ACTIVE_FOLDERS_KEY: &str = "db.active";

pub struct Library {
    files: Vec<String>,
    expanded: BTreeSet<String>,
    store: Arc<Store>,
}

impl Library {
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        let expanded = store
            .get::<HashMap<String, bool>>(ACTIVE_FOLDERS_KEY)
            .map(|folders| {
                folders
                    .into_iter()
                    .filter_map(|(path, active)| active.then_some(path))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            files: Vec::new(),
            expanded,
            store,
        }
    }

    /// Replaces the file list wholesale. Expansion state is keyed by path
    /// and survives the update.
    pub fn replace(&mut self, files: Vec<String>) {
        self.files = files;
    }

    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    #[must_use]
    pub fn is_expanded(&self, folder: &str) -> bool {
        self.expanded.contains(folder)
    }

    /// Toggles a folder and persists the expanded set best-effort.
    pub fn toggle(&mut self, folder: &str) {
        if !self.expanded.remove(folder) {
            self.expanded.insert(folder.to_owned());
        }

        let folders: HashMap<&str, bool> = self
            .expanded
            .iter()
            .map(|path| (path.as_str(), true))
            .collect();
        self.store.set(ACTIVE_FOLDERS_KEY, &folders);
    }

    /// All uris a drag starting on `path` exports: the file itself, or
    /// every file below a folder, in database order.
    #[must_use]
    pub fn uris_under(&self, path: &str) -> Vec<String> {
        if self.files.iter().any(|file| file == path) {
            return vec![path.to_owned()];
        }

        let prefix = format!("{path}/");
        self.files
            .iter()
            .filter(|file| file.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Double click on a file: append it to the playlist.
    pub fn add_file(&self, path: &str) -> Option<Command> {
        if self.files.iter().any(|file| file == path) {
            Some(Command::Add {
                uri: path.to_owned(),
            })
        } else {
            debug!("add of unknown file `{path}`");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library(files: &[&str]) -> Library {
        let mut library = Library::new(Arc::new(Store::open(None)));
        library.replace(files.iter().map(|&f| f.to_owned()).collect());
        library
    }

    #[test]
    fn a_file_exports_itself() {
        let library = library(&["a/one.flac", "a/b/two.flac"]);
        assert_eq!(library.uris_under("a/one.flac"), vec!["a/one.flac"]);
    }

    #[test]
    fn a_folder_exports_every_file_below_it() {
        let library = library(&[
            "a/one.flac",
            "a/b/two.flac",
            "a/b/three.flac",
            "ab/four.flac",
        ]);
        assert_eq!(
            library.uris_under("a"),
            vec!["a/one.flac", "a/b/two.flac", "a/b/three.flac"]
        );
        // Prefix matching stops at path separators.
        assert_eq!(library.uris_under("a/b"), vec!["a/b/two.flac", "a/b/three.flac"]);
    }

    #[test]
    fn unknown_paths_export_nothing() {
        let library = library(&["a/one.flac"]);
        assert!(library.uris_under("z").is_empty());
        assert_eq!(library.add_file("z/unknown.flac"), None);
    }

    #[test]
    fn double_click_adds_a_known_file() {
        let library = library(&["a/one.flac"]);
        assert_eq!(
            library.add_file("a/one.flac"),
            Some(Command::Add {
                uri: "a/one.flac".to_owned()
            })
        );
    }

    #[test]
    fn expansion_state_persists_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let store = Arc::new(Store::open(Some(path.clone())));
        let mut library = Library::new(Arc::clone(&store));
        library.toggle("albums");
        library.toggle("singles");
        library.toggle("singles");
        assert!(library.is_expanded("albums"));
        assert!(!library.is_expanded("singles"));

        let reopened = Library::new(Arc::new(Store::open(Some(path))));
        assert!(reopened.is_expanded("albums"));
        assert!(!reopened.is_expanded("singles"));
    }
}
