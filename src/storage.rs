// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::AppState;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Paydown", "paydown"));

pub fn default_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("paydown.json"))
}

/// The single JSON document holding the whole ledger.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(default_path()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty state; a corrupt one is an error.
    pub fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            return Ok(AppState::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Read ledger at {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Parse ledger at {}", self.path.display()))
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Serialize ledger")?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Create {}", dir.display()))?;
            }
        }
        fs::write(&self.path, json)
            .with_context(|| format!("Write ledger at {}", self.path.display()))
    }
}
