//! Project configuration, read from `bomgen.toml` next to the schematic.
//!
//! ```toml
//! suppliers = ["Mouser", "TME"]
//! exempt_prefixes = ["C", "R", "TP"]
//!
//! [mouser]
//! api_key = "..."
//! ```
//!
//! Everything has defaults, so a missing file is fine; the Mouser API key
//! can also come from the `MOUSER_API_KEY` environment variable.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "bomgen.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Supplier property names to read SKUs from, in priority order.
    #[serde(default = "default_suppliers")]
    pub suppliers: Vec<String>,
    /// Reference categories allowed to omit an MPN.
    #[serde(default = "default_exempt_prefixes")]
    pub exempt_prefixes: Vec<String>,
    #[serde(default)]
    pub mouser: MouserConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MouserConfig {
    pub api_key: Option<String>,
}

fn default_suppliers() -> Vec<String> {
    vec!["Mouser".to_string(), "TME".to_string()]
}

fn default_exempt_prefixes() -> Vec<String> {
    vec!["C".to_string(), "R".to_string(), "TP".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Config {
            suppliers: default_suppliers(),
            exempt_prefixes: default_exempt_prefixes(),
            mouser: MouserConfig::default(),
        }
    }
}

impl Config {
    /// Load `bomgen.toml` from the given directory, falling back to
    /// defaults when the file does not exist.
    pub fn load(dir: &Path) -> Result<Config> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn exempt_set(&self) -> BTreeSet<String> {
        self.exempt_prefixes.iter().cloned().collect()
    }

    /// Mouser API key: environment first, config second.
    pub fn mouser_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var("MOUSER_API_KEY") {
            return Ok(key);
        }
        self.mouser
            .api_key
            .clone()
            .context("no Mouser API key: set MOUSER_API_KEY or [mouser] api_key in bomgen.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.suppliers, vec!["Mouser", "TME"]);
        assert_eq!(config.exempt_prefixes, vec!["C", "R", "TP"]);
        assert!(config.mouser.api_key.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
suppliers = ["LCSC"]
exempt_prefixes = ["TP", "H"]

[mouser]
api_key = "secret"
"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.suppliers, vec!["LCSC"]);
        assert_eq!(config.exempt_set().len(), 2);
        assert!(config.exempt_set().contains("H"));
        assert_eq!(config.mouser.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "supplier = [\"typo\"]\n").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
