use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_SITE: &str = "Default";

fn default_site() -> String {
    DEFAULT_SITE.to_string()
}

fn default_true() -> bool {
    true
}

/// A named controller connection. The password lives in the keychain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default = "default_true")]
    pub verify_ssl: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TargetStore {
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl TargetStore {
    /// `<config dir>/omada/targets.json`
    pub fn default_path() -> Result<PathBuf, AppError> {
        dirs::config_dir()
            .map(|dir| dir.join("omada").join("targets.json"))
            .ok_or_else(|| AppError::Config("Could not determine config directory".into()))
    }

    /// Load the store; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Insert or replace by name. The first target becomes the default.
    pub fn upsert(&mut self, target: TargetConfig) {
        if self.default.is_none() {
            self.default = Some(target.name.clone());
        }
        match self.targets.iter_mut().find(|t| t.name == target.name) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn remove(&mut self, name: &str) -> Result<TargetConfig, AppError> {
        let idx = self
            .targets
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| AppError::TargetNotFound(name.to_string()))?;
        let removed = self.targets.remove(idx);
        if self.default.as_deref() == Some(name) {
            self.default = None;
        }
        Ok(removed)
    }

    pub fn set_default(&mut self, name: &str) -> Result<(), AppError> {
        if self.get(name).is_none() {
            return Err(AppError::TargetNotFound(name.to_string()));
        }
        self.default = Some(name.to_string());
        Ok(())
    }

    /// Pick the target to connect to: the requested one, else the default,
    /// else the only one stored.
    pub fn select(&self, requested: Option<&str>) -> Result<&TargetConfig, AppError> {
        if let Some(name) = requested {
            return self
                .get(name)
                .ok_or_else(|| AppError::TargetNotFound(name.to_string()));
        }
        if let Some(target) = self.default.as_deref().and_then(|name| self.get(name)) {
            return Ok(target);
        }
        match self.targets.as_slice() {
            [only] => Ok(only),
            _ => Err(AppError::NoTarget),
        }
    }
}
