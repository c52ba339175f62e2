// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Durable key -> shell command bindings, shared between processes.
//!
//! Every operation is one lock acquisition, one load, and at most one save of the whole
//! document (see [`super::data_lock`]). Nothing is atomic *across* calls: if two
//! processes look up and then store the same key, the last writer wins.

use std::{fs,
          io::ErrorKind,
          path::{Path, PathBuf}};

use crate::{Binding, BindingDocument, Command, SedshellError, SedshellResult,
            config_folder, data_lock};

#[derive(Debug, Clone)]
pub struct KeybindingStore {
    data_file_path: PathBuf,
}

impl KeybindingStore {
    /// The store lives in `<config_folder>/data.json`. Nothing is read or created until
    /// the first operation.
    #[must_use]
    pub fn new(config_folder: &Path) -> Self {
        Self {
            data_file_path: config_folder::get_store_file_path(config_folder),
        }
    }

    #[must_use]
    pub fn data_file_path(&self) -> &Path { &self.data_file_path }

    /// Bind `key` to `command`, replacing any existing binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock or data file can't be accessed, or the existing
    /// document is malformed.
    pub fn store(&self, key: char, command: &str, consume: bool) -> SedshellResult<()> {
        // % is Display, ? is Debug.
        tracing::debug!(
            message = "Storing binding",
            key = ?key,
            command = %command,
            consume = consume
        );
        self.with_data(|document| {
            document.insert(key, Binding::new(command, consume));
            true
        })
    }

    /// Look up the binding for `key` and turn it into a [`Command`]. User bindings are
    /// checked before the built in keys, so this is what lets them be overridden.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock or data file can't be accessed, or the document is
    /// malformed.
    pub fn lookup(&self, key: char) -> SedshellResult<Option<Command>> {
        let mut found = None;
        self.with_data(|document| {
            found = document.get(key).cloned();
            false
        })?;
        tracing::debug!(message = "Looked up binding", key = ?key, found = ?found);
        Ok(found.map(Command::new_bound))
    }

    /// The user bindings section of the help menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock or data file can't be accessed, or the document is
    /// malformed.
    pub fn describe_all(&self) -> SedshellResult<String> {
        let mut lines = vec![];
        self.with_data(|document| {
            lines = document.render_menu_lines();
            false
        })?;
        Ok(format!("\n{}\n", lines.join("\n")))
    }

    /// Run `op` against the current document while holding the data lock. When `op`
    /// returns `true` the whole document is written back before the lock is released.
    fn with_data(
        &self,
        op: impl FnOnce(&mut BindingDocument) -> bool,
    ) -> SedshellResult<()> {
        let _guard = data_lock::acquire(&self.data_file_path)?;

        let mut document = load_document(&self.data_file_path)?;
        if op(&mut document) {
            save_document(&self.data_file_path, &document)?;
        }

        Ok(())
    }
}

/// A missing file is an empty store. Anything else that goes wrong is an error.
fn load_document(path: &Path) -> SedshellResult<BindingDocument> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Ok(BindingDocument::default());
        }
        Err(source) => {
            return Err(SedshellError::StoreIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| SedshellError::MalformedStore {
        path: path.to_path_buf(),
        source,
    })
}

/// Write to a sibling temp file and rename it over the original, so readers that don't
/// take the lock still never see a half written document.
fn save_document(path: &Path, document: &BindingDocument) -> SedshellResult<()> {
    let to_store_error = |source: std::io::Error| SedshellError::StoreIo {
        path: path.to_path_buf(),
        source,
    };

    let content = serde_json::to_string(document).map_err(|source| {
        SedshellError::MalformedStore {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    fs::write(&tmp_path, content).map_err(to_store_error)?;
    fs::rename(&tmp_path, path).map_err(to_store_error)?;

    tracing::debug!(message = "Saved keybinding store", path = %path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OneShot;
    use pretty_assertions::assert_eq;
    use std::{sync::Arc, thread};

    #[test]
    fn test_lookup_in_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = KeybindingStore::new(temp_dir.path());

        assert!(store.lookup('c').unwrap().is_none());
        // Reads never create the data file.
        assert!(!store.data_file_path().exists());
    }

    #[test]
    fn test_store_then_lookup_from_fresh_instance() {
        let temp_dir = tempfile::tempdir().unwrap();
        KeybindingStore::new(temp_dir.path())
            .store('c', "echo", false)
            .unwrap();

        let fresh = KeybindingStore::new(temp_dir.path());
        let command = fresh.lookup('c').unwrap().unwrap();

        assert!(matches!(
            command,
            Command::RunOnce(OneShot::Bound(binding)) if binding == Binding::new("echo", false)
        ));
    }

    #[test]
    fn test_store_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = KeybindingStore::new(temp_dir.path());
        store.store('c', "echo", true).unwrap();
        store.store('c', "cat", false).unwrap();

        let json = fs::read_to_string(store.data_file_path()).unwrap();
        assert_eq!(json, r#"{"commands":{"c":["cat",false]}}"#);
    }

    #[test]
    fn test_describe_all() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = KeybindingStore::new(temp_dir.path());
        store.store('x', "xdg-open", false).unwrap();
        store.store('b', "git blame", true).unwrap();

        assert_eq!(
            store.describe_all().unwrap(),
            "\nb - ! git blame\nx - & xdg-open\n"
        );
    }

    #[test]
    fn test_malformed_store_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = KeybindingStore::new(temp_dir.path());
        fs::write(store.data_file_path(), "{not json").unwrap();

        assert!(matches!(
            store.lookup('c'),
            Err(SedshellError::MalformedStore { .. })
        ));
        assert!(matches!(
            store.store('c', "echo", true),
            Err(SedshellError::MalformedStore { .. })
        ));
    }

    #[test]
    fn test_unwritable_dir_is_an_error() {
        let store = KeybindingStore::new(Path::new("/nonexistent/sedshell"));
        assert!(matches!(
            store.store('c', "echo", true),
            Err(SedshellError::StoreIo { .. })
        ));
    }

    #[test]
    fn test_concurrent_stores_are_not_lost() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = Arc::new(temp_dir.path().to_path_buf());

        let handles: Vec<_> = ('a'..='h')
            .map(|key| {
                let config = Arc::clone(&config);
                thread::spawn(move || {
                    KeybindingStore::new(&config)
                        .store(key, &format!("cmd-{key}"), true)
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let description = KeybindingStore::new(&config).describe_all().unwrap();
        for key in 'a'..='h' {
            assert!(description.contains(&format!("{key} - ! cmd-{key}")));
        }
    }
}
