use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use config::{Config, ConfigError, File};
use serde::Deserialize;

use qfind::{ScoreStrategy, WalkOptions, app_dirs};

use crate::cli::CliArgs;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    search: SearchSection,
    filesystem: FilesystemSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
    strategy: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FilesystemSection {
    root: Option<PathBuf>,
    include_hidden: Option<bool>,
    follow_symlinks: Option<bool>,
    respect_ignore_files: Option<bool>,
    git_ignore: Option<bool>,
    git_global: Option<bool>,
    git_exclude: Option<bool>,
    threads: Option<usize>,
    max_depth: Option<usize>,
    global_ignores: Option<Vec<String>>,
}

/// Fully resolved configuration the binary runs with.
pub(crate) struct ResolvedConfig {
    pub(crate) root: PathBuf,
    pub(crate) walk: WalkOptions,
    pub(crate) strategy: ScoreStrategy,
}

impl ResolvedConfig {
    pub(crate) fn print_summary(&self) {
        println!("Effective configuration:");
        println!("  Root: {}", self.root.display());
        println!("  Strategy: {}", self.strategy.as_str());
        println!("  Include hidden: {}", bool_to_word(self.walk.include_hidden));
        println!(
            "  Follow symlinks: {}",
            bool_to_word(self.walk.follow_symlinks)
        );
        println!(
            "  Respect ignore files: {}",
            bool_to_word(self.walk.respect_ignore_files)
        );
        println!("  Git ignore: {}", bool_to_word(self.walk.git_ignore));
        match self.walk.max_depth {
            Some(depth) => println!("  Max depth: {depth}"),
            None => println!("  Max depth: unlimited"),
        }
        if let Some(threads) = self.walk.threads {
            println!("  Threads: {threads}");
        }
        if !self.walk.global_ignores.is_empty() {
            println!("  Global ignores: {}", self.walk.global_ignores.join(", "));
        }
    }
}

pub(crate) fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    raw.apply_cli_overrides(cli);
    raw.resolve()
}

fn build_config(cli: &CliArgs) -> Result<Config> {
    let mut builder = Config::builder();

    if !cli.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &cli.config {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("qfind")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
    );

    builder.build().map_err(|err| match err {
        ConfigError::Frozen => anyhow!("configuration builder is frozen"),
        other => other.into(),
    })
}

fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(dir) = app_dirs::get_config_dir() {
        files.push(dir.join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".qfind.toml"));
        files.push(current_dir.join("qfind.toml"));
    }

    files
}

impl RawConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(root) = cli.root.clone() {
            self.filesystem.root = Some(root);
        }
        if let Some(value) = cli.hidden {
            self.filesystem.include_hidden = Some(value);
        }
        if let Some(value) = cli.max_depth {
            self.filesystem.max_depth = Some(value);
        }
        if let Some(strategy) = cli.strategy {
            self.search.strategy = Some(strategy.as_strategy().as_str().to_string());
        }
    }

    fn resolve(self) -> Result<ResolvedConfig> {
        let root = match self.filesystem.root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let defaults = WalkOptions::default();
        let walk = WalkOptions {
            include_hidden: self
                .filesystem
                .include_hidden
                .unwrap_or(defaults.include_hidden),
            follow_symlinks: self
                .filesystem
                .follow_symlinks
                .unwrap_or(defaults.follow_symlinks),
            respect_ignore_files: self
                .filesystem
                .respect_ignore_files
                .unwrap_or(defaults.respect_ignore_files),
            git_ignore: self.filesystem.git_ignore.unwrap_or(defaults.git_ignore),
            git_global: self.filesystem.git_global.unwrap_or(defaults.git_global),
            git_exclude: self.filesystem.git_exclude.unwrap_or(defaults.git_exclude),
            global_ignores: self
                .filesystem
                .global_ignores
                .unwrap_or(defaults.global_ignores),
            threads: self.filesystem.threads,
            max_depth: self.filesystem.max_depth,
        };

        let strategy = match self.search.strategy.as_deref() {
            None => ScoreStrategy::default(),
            Some(name) => ScoreStrategy::from_name(name)
                .ok_or_else(|| anyhow!("unknown scoring strategy '{name}'"))?,
        };

        Ok(ResolvedConfig {
            root,
            walk,
            strategy,
        })
    }
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_names_are_rejected() {
        let raw = RawConfig {
            search: SearchSection {
                strategy: Some("guesswork".to_string()),
            },
            filesystem: FilesystemSection::default(),
        };
        assert!(raw.resolve().is_err());
    }

    #[test]
    fn strategy_names_resolve() {
        let raw = RawConfig {
            search: SearchSection {
                strategy: Some("edit-distance".to_string()),
            },
            filesystem: FilesystemSection {
                root: Some(PathBuf::from("/tmp")),
                ..FilesystemSection::default()
            },
        };
        let resolved = raw.resolve().expect("resolve");
        assert_eq!(resolved.strategy, ScoreStrategy::EditDistance);
        assert_eq!(resolved.root, PathBuf::from("/tmp"));
    }
}
