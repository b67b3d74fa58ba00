//! Configuration management.
//!
//! Settings live in a per-environment `config.yml` in the theme root:
//!
//! ```yaml
//! development:
//!   apikey: 2b78f637972b1c9d
//!   store: https://dev.shop.example.com
//!   theme_id: 1
//!   sass:
//!     output_style: nested
//! production:
//!   ...
//! ```
//!
//! A [`Config`] is built once per invocation: file values merged with
//! command-line/environment overrides (overrides win), validated, and then
//! passed immutably to every component. There is no ambient configuration
//! state. Saving writes the file back only when the effective values for
//! the environment actually changed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sass::SassOutputStyle;

/// Default environment when `-e/--env` is not given.
pub const DEFAULT_ENV: &str = "development";

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub apikey: Option<String>,
    pub store: Option<String>,
    pub theme_id: Option<u64>,
    pub sass_output_style: Option<SassOutputStyle>,
}

/// One environment's section in `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct EnvEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    apikey: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sass: Option<SassEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct SassEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    output_style: Option<SassOutputStyle>,
}

/// Effective configuration for one command invocation. Immutable.
#[derive(Debug, Clone)]
pub struct Config {
    pub env: String,
    pub apikey: String,
    pub store: String,
    /// Absent only for commands that run before a theme exists
    /// (`init`, `list`).
    pub theme_id: Option<u64>,
    pub sass_output_style: SassOutputStyle,
}

impl Config {
    /// Load the configuration for `env`, merging file values with overrides.
    ///
    /// `needs_theme_id` controls whether a missing theme id is a validation
    /// error; `init` and `list` run without one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] listing every missing required flag,
    /// or an I/O/YAML error if the file exists but cannot be read.
    pub fn load(
        path: &Path,
        env: &str,
        overrides: &Overrides,
        needs_theme_id: bool,
    ) -> Result<Self> {
        let file = read_file(path)?;
        let entry = file.get(env).cloned().unwrap_or_default();

        let apikey = overrides.apikey.clone().or(entry.apikey);
        let store = overrides.store.clone().or(entry.store);
        let theme_id = overrides.theme_id.or(entry.theme_id);
        let sass_output_style = overrides
            .sass_output_style
            .or(entry.sass.and_then(|s| s.output_style))
            .unwrap_or_default();

        let mut missing = Vec::new();
        if apikey.as_deref().is_none_or(str::is_empty) {
            missing.push("-a/--apikey".to_string());
        }
        if store.as_deref().is_none_or(str::is_empty) {
            missing.push("-s/--store".to_string());
        }
        if needs_theme_id && theme_id.is_none() {
            missing.push("-t/--theme-id".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::MissingConfig {
                env: env.to_string(),
                missing,
            });
        }

        Ok(Self {
            env: env.to_string(),
            apikey: apikey.unwrap_or_default(),
            store: store
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            theme_id,
            sass_output_style,
        })
    }

    /// The theme id, required by every sync operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming `-t/--theme-id` when absent.
    pub fn require_theme_id(&self) -> Result<u64> {
        self.theme_id.ok_or_else(|| Error::MissingConfig {
            env: self.env.clone(),
            missing: vec!["-t/--theme-id".to_string()],
        })
    }

    /// Preview URL for the configured theme.
    #[must_use]
    pub fn preview_url(&self) -> String {
        match self.theme_id {
            Some(id) => format!("{}?preview_theme={id}", self.store),
            None => self.store.clone(),
        }
    }

    /// Persist this configuration under its environment in `config.yml`.
    ///
    /// Sections for other environments are preserved. Returns `true` if
    /// the file was written, `false` if the stored values already matched.
    pub fn save(&self, path: &Path) -> Result<bool> {
        let mut file = read_file(path)?;
        let entry = self.to_entry();

        if file.get(&self.env) == Some(&entry) {
            return Ok(false);
        }

        file.insert(self.env.clone(), entry);
        let yaml = serde_yaml::to_string(&file)?;
        fs::write(path, yaml).map_err(|e| Error::IoAt {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::info!("[{}] Configuration was updated.", self.env);
        Ok(true)
    }

    fn to_entry(&self) -> EnvEntry {
        EnvEntry {
            apikey: Some(self.apikey.clone()),
            store: Some(self.store.clone()),
            theme_id: self.theme_id,
            sass: Some(SassEntry {
                output_style: Some(self.sass_output_style),
            }),
        }
    }
}

fn read_file(path: &Path) -> Result<BTreeMap<String, EnvEntry>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read_to_string(path).map_err(|e| Error::IoAt {
        path: path.to_path_buf(),
        source: e,
    })?;
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_yaml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_environment_section() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "development:\n  apikey: key123\n  store: https://dev.example.com/\n  theme_id: 7\n  sass:\n    output_style: compressed\n",
        );

        let config =
            Config::load(&path, "development", &Overrides::default(), true).unwrap();
        assert_eq!(config.apikey, "key123");
        // Trailing slash is stripped so URL joining stays predictable.
        assert_eq!(config.store, "https://dev.example.com");
        assert_eq!(config.theme_id, Some(7));
        assert_eq!(config.sass_output_style, SassOutputStyle::Compressed);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "development:\n  apikey: filekey\n  store: https://file.example.com\n  theme_id: 1\n",
        );

        let overrides = Overrides {
            apikey: Some("clikey".to_string()),
            theme_id: Some(9),
            ..Overrides::default()
        };
        let config = Config::load(&path, "development", &overrides, true).unwrap();
        assert_eq!(config.apikey, "clikey");
        assert_eq!(config.store, "https://file.example.com");
        assert_eq!(config.theme_id, Some(9));
    }

    #[test]
    fn missing_fields_reported_together() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        let err = Config::load(&path, "development", &Overrides::default(), true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[development] argument -a/--apikey, -s/--store, -t/--theme-id are required"
        );
    }

    #[test]
    fn theme_id_optional_for_preflight_commands() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        let overrides = Overrides {
            apikey: Some("k".to_string()),
            store: Some("https://s.example.com".to_string()),
            ..Overrides::default()
        };

        let config = Config::load(&path, "development", &overrides, false).unwrap();
        assert_eq!(config.theme_id, None);
        assert!(config.require_theme_id().is_err());
    }

    #[test]
    fn save_round_trips_and_preserves_other_envs() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "production:\n  apikey: prodkey\n  store: https://prod.example.com\n  theme_id: 2\n",
        );

        let config = Config {
            env: "development".to_string(),
            apikey: "devkey".to_string(),
            store: "https://dev.example.com".to_string(),
            theme_id: Some(5),
            sass_output_style: SassOutputStyle::Nested,
        };
        assert!(config.save(&path).unwrap());

        let reloaded =
            Config::load(&path, "development", &Overrides::default(), true).unwrap();
        assert_eq!(reloaded.apikey, "devkey");
        assert_eq!(reloaded.theme_id, Some(5));

        let prod = Config::load(&path, "production", &Overrides::default(), true).unwrap();
        assert_eq!(prod.apikey, "prodkey");
        assert_eq!(prod.theme_id, Some(2));
    }

    #[test]
    fn save_skips_write_when_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");

        let config = Config {
            env: "development".to_string(),
            apikey: "devkey".to_string(),
            store: "https://dev.example.com".to_string(),
            theme_id: Some(5),
            sass_output_style: SassOutputStyle::Nested,
        };
        assert!(config.save(&path).unwrap());
        assert!(!config.save(&path).unwrap());
    }

    #[test]
    fn preview_url_includes_theme_id() {
        let config = Config {
            env: "development".to_string(),
            apikey: "k".to_string(),
            store: "https://dev.example.com".to_string(),
            theme_id: Some(5),
            sass_output_style: SassOutputStyle::Nested,
        };
        assert_eq!(config.preview_url(), "https://dev.example.com?preview_theme=5");
    }
}
