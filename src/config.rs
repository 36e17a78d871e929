use std::path::PathBuf;

use crate::errors::{Result, SnipitError};

pub const HOME_ENV: &str = "SNIPIT_HOME";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub base_dir: PathBuf,
    pub store_path: PathBuf,
    pub lock_path: PathBuf,
}

impl AppPaths {
    /// Resolves `$SNIPIT_HOME`, falling back to `~/.snipit`.
    pub fn new() -> Result<Self> {
        let env_home = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty());
        let base = match env_home {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir().ok_or(SnipitError::NoHomeDir)?.join(".snipit"),
        };
        Ok(Self::from_base(base))
    }

    pub fn from_base(base: PathBuf) -> Self {
        Self {
            store_path: base.join("snippets.json"),
            lock_path: base.join("snippets.lock"),
            base_dir: base,
        }
    }
}
