//! Compile configuration (`qail-ir.toml`).
//!
//! ```toml
//! dialect = "sqlserver"
//! layout = "block"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{IrError, IrResult};
use crate::transpiler::{Dialect, Layout};

pub const CONFIG_FILE: &str = "qail-ir.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileConfig {
    pub dialect: Dialect,
    pub layout: Layout,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    dialect: Option<String>,
    layout: Option<String>,
}

impl CompileConfig {
    pub fn from_toml(content: &str) -> IrResult<Self> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| IrError::Config(e.to_string()))?;
        let mut config = CompileConfig::default();
        if let Some(dialect) = raw.dialect {
            config.dialect = dialect.parse()?;
        }
        if let Some(layout) = raw.layout {
            config.layout = layout.parse()?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> IrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `explicit`, else `./qail-ir.toml`, else the user config
    /// directory, else defaults. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> IrResult<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qail-ir").join("config.toml"));
        }
        paths
    }
}
