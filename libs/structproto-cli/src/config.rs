// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! `structproto.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "structproto.toml";

/// Values read from a config file. Every key is optional; command-line flags
/// take precedence.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sources: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub current: Option<PathBuf>,
    pub filter: Option<String>,
    pub snake_case: Option<bool>,
    pub package: Option<String>,
    pub output_file: Option<String>,
    pub reclaim_removed: Option<bool>,
}

impl Config {
    /// Read a config file. Relative paths inside it are taken relative to
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` if given, else the default file if it exists, else
    /// an empty config.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default = working_dir.join(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    fn rebase(&mut self, base: &Path) {
        for source in &mut self.sources {
            *source = base.join(&*source);
        }
        if let Some(out_dir) = &mut self.out_dir {
            *out_dir = base.join(&*out_dir);
        }
        if let Some(current) = &mut self.current {
            *current = base.join(&*current);
        }
    }
}
