//! Filesystem-backed corpus provider.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Result, bail};
use ignore::{DirEntry, Error as IgnoreError, WalkBuilder, WalkState};

use crate::providers::CorpusProvider;

/// Walker configuration for filesystem enumeration.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub respect_ignore_files: bool,
    pub git_ignore: bool,
    pub git_global: bool,
    pub git_exclude: bool,
    pub global_ignores: Vec<String>,
    pub threads: Option<usize>,
    pub max_depth: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            include_hidden: true,
            follow_symlinks: false,
            respect_ignore_files: true,
            git_ignore: true,
            git_global: true,
            git_exclude: true,
            global_ignores: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                ".venv".to_string(),
                ".cache".to_string(),
            ],
            threads: None,
            max_depth: None,
        }
    }
}

/// Corpus provider that enumerates files under a root directory.
///
/// Paths are reported relative to the root with forward slashes, matching the
/// index's normalization invariant.
pub struct FilesystemCorpus {
    root: PathBuf,
    options: WalkOptions,
}

impl FilesystemCorpus {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    #[must_use]
    pub fn with_options(root: impl Into<PathBuf>, options: WalkOptions) -> Self {
        Self {
            root: root.into(),
            options,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CorpusProvider for FilesystemCorpus {
    fn enumerate(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            bail!("corpus root {} is not a directory", self.root.display());
        }

        let (tx, rx) = mpsc::channel();
        let walker_root = Arc::new(self.root.clone());
        let threads = self
            .options
            .threads
            .filter(|threads| *threads > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
            });
        let global_ignores = self.options.global_ignores.clone();

        WalkBuilder::new(walker_root.as_path())
            .hidden(!self.options.include_hidden)
            .follow_links(self.options.follow_symlinks)
            .git_ignore(self.options.git_ignore)
            .git_global(self.options.git_global)
            .git_exclude(self.options.git_exclude)
            .ignore(self.options.respect_ignore_files)
            .parents(true)
            .threads(threads)
            .max_depth(self.options.max_depth)
            .build_parallel()
            .run(|| {
                let sender = tx.clone();
                let root = Arc::clone(&walker_root);
                let global_ignores = global_ignores.clone();
                Box::new(move |entry: Result<DirEntry, IgnoreError>| {
                    if let Ok(entry) = entry {
                        let Some(file_type) = entry.file_type() else {
                            return WalkState::Continue;
                        };
                        if !file_type.is_file() {
                            return WalkState::Continue;
                        }

                        let path = entry.path();
                        if path.components().any(|comp| {
                            comp.as_os_str()
                                .to_str()
                                .map(|s| global_ignores.iter().any(|g| g == s))
                                .unwrap_or(false)
                        }) {
                            return WalkState::Continue;
                        }

                        let relative = path.strip_prefix(root.as_path()).unwrap_or(path);
                        let relative_display = relative.to_string_lossy().replace('\\', "/");
                        if sender.send(relative_display).is_err() {
                            return WalkState::Quit;
                        }
                    }

                    WalkState::Continue
                })
            });

        drop(tx);

        let mut paths: Vec<String> = rx.into_iter().collect();
        paths.sort();
        log::debug!(
            "filesystem corpus at {} enumerated {} files",
            self.root.display(),
            paths.len()
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn enumerates_relative_normalized_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("sub")).expect("mkdir");
        fs::write(dir.path().join("sub/file.txt"), b"x").expect("write");
        fs::write(dir.path().join("top.rs"), b"y").expect("write");

        let corpus = FilesystemCorpus::new(dir.path());
        let paths = corpus.enumerate().expect("enumerate");
        assert_eq!(paths, ["sub/file.txt", "top.rs"]);
    }

    #[test]
    fn missing_root_fails_enumeration() {
        let corpus = FilesystemCorpus::new("/definitely/not/here");
        assert!(corpus.enumerate().is_err());
    }

    #[test]
    fn global_ignores_prune_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("node_modules")).expect("mkdir");
        fs::write(dir.path().join("node_modules/dep.js"), b"x").expect("write");
        fs::write(dir.path().join("main.js"), b"y").expect("write");

        let corpus = FilesystemCorpus::new(dir.path());
        let paths = corpus.enumerate().expect("enumerate");
        assert_eq!(paths, ["main.js"]);
    }
}
