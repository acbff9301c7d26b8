//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bloom_storefront::StoreConfig;

use crate::config;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["bouquet.toml", ".bouquet.toml", "bouquet.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Store configuration.
    pub config: StoreConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (config::load(&path)?, Some(path))
            }
            None => match find_config_file(&cwd) {
                Some(path) => (config::load(&path)?, Some(path)),
                None => (StoreConfig::default(), None),
            },
        };

        match &config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "config loaded");
                output.debug(&format!("Using config: {}", path.display()));
            }
            None => tracing::debug!(cwd = %cwd.display(), "no config file found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        cwd.join(path)
    }
}

/// Find a config file in `start` or any parent directory.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
            tracing::trace!(candidate = %candidate.display(), "config not here");
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bouquet-cli-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_finds_config_in_parent() {
        let root = scratch_dir("parent");
        let nested = root.join("orders").join("june");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.join("bouquet.toml"), "store_name = \"Test\"\n").unwrap();

        assert_eq!(find_config_file(&nested), Some(root.join("bouquet.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_toml_preferred_over_json() {
        let root = scratch_dir("order");
        std::fs::write(root.join("bouquet.json"), "{}").unwrap();
        std::fs::write(root.join(".bouquet.toml"), "").unwrap();

        assert_eq!(find_config_file(&root), Some(root.join(".bouquet.toml")));
        let _ = std::fs::remove_dir_all(&root);
    }
}
