//! Configuration file management for huddle.
//!
//! Provides a TOML-based config file at `~/.config/huddle/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use huddle_db::config::DbConfig;

/// Base URL used for share links when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub share: ShareSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShareSection {
    /// Scheme and host that participants open, e.g. `https://plans.example.org`.
    pub base_url: String,
}

impl Default for ShareSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the huddle config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/huddle` or `~/.config/huddle`,
/// also on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("huddle");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("huddle")
}

/// Return the path to the huddle config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

/// Write `config` to `path`. Sets file permissions to 0600 on Unix, since the
/// database URL may carry a password.
pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct HuddleConfig {
    pub db_config: DbConfig,
    pub share_base_url: String,
}

impl HuddleConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: `cli_db_url` > `HUDDLE_DATABASE_URL` env > `config_file.database.url` > `DbConfig::DEFAULT_URL`
    /// - Share base URL: `HUDDLE_BASE_URL` env > `config_file.share.base_url` > `DEFAULT_BASE_URL`
    pub fn resolve(cli_db_url: Option<&str>) -> Self {
        let file_config = load_config().ok();

        let db_url = if let Some(url) = cli_db_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(DbConfig::URL_ENV_VAR) {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };

        let share_base_url = if let Ok(url) = std::env::var("HUDDLE_BASE_URL") {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.share.base_url.clone()
        } else {
            DEFAULT_BASE_URL.to_string()
        };

        Self {
            db_config: DbConfig::new(db_url),
            share_base_url,
        }
    }

    /// Link participants open to answer a plan.
    pub fn share_link(&self, plan_id: &str) -> String {
        format!(
            "{}/plan?id={plan_id}",
            self.share_base_url.trim_end_matches('/')
        )
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    /// Point config lookup at an empty temp dir for the guard's lifetime.
    struct IsolatedConfigDir {
        _tmp: tempfile::TempDir,
        orig_xdg: Option<String>,
    }

    impl IsolatedConfigDir {
        fn new() -> Self {
            let tmp = tempfile::TempDir::new().unwrap();
            let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
            unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };
            Self {
                _tmp: tmp,
                orig_xdg,
            }
        }
    }

    impl Drop for IsolatedConfigDir {
        fn drop(&mut self) {
            match self.orig_xdg.take() {
                Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
                None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
            }
        }
    }

    #[test]
    fn save_and_load_config_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("huddle").join("config.toml");

        let original = ConfigFile {
            database: DatabaseSection {
                url: "postgresql://testhost:5432/testdb".to_string(),
            },
            share: ShareSection {
                base_url: "https://plans.example.org".to_string(),
            },
        };
        save_config_to(&path, &original).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.database.url, original.database.url);
        assert_eq!(loaded.share.base_url, original.share.base_url);
    }

    #[test]
    fn share_section_defaults_when_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[database]\nurl = \"postgresql://h:5432/d\"\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.share.base_url, DEFAULT_BASE_URL);
    }

    #[cfg(unix)]
    #[test]
    fn save_config_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let cfg = ConfigFile {
            database: DatabaseSection {
                url: "postgresql://localhost:5432/huddle".to_string(),
            },
            share: ShareSection::default(),
        };
        save_config_to(&path, &cfg).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn resolve_with_cli_flag_overrides_all() {
        let _lock = lock_env();
        let _dir = IsolatedConfigDir::new();

        unsafe { std::env::set_var("HUDDLE_DATABASE_URL", "postgresql://env:5432/envdb") };
        let config = HuddleConfig::resolve(Some("postgresql://cli:5432/clidb"));
        assert_eq!(config.db_config.database_url, "postgresql://cli:5432/clidb");
        unsafe { std::env::remove_var("HUDDLE_DATABASE_URL") };
    }

    #[test]
    fn resolve_with_env_var_overrides_config_file() {
        let _lock = lock_env();
        let _dir = IsolatedConfigDir::new();

        save_config(&ConfigFile {
            database: DatabaseSection {
                url: "postgresql://file:5432/filedb".to_string(),
            },
            share: ShareSection::default(),
        })
        .unwrap();

        unsafe { std::env::set_var("HUDDLE_DATABASE_URL", "postgresql://env:5432/envdb") };
        let config = HuddleConfig::resolve(None);
        assert_eq!(config.db_config.database_url, "postgresql://env:5432/envdb");
        unsafe { std::env::remove_var("HUDDLE_DATABASE_URL") };

        let config = HuddleConfig::resolve(None);
        assert_eq!(config.db_config.database_url, "postgresql://file:5432/filedb");
    }

    #[test]
    fn resolve_defaults_when_nothing_set() {
        let _lock = lock_env();
        let _dir = IsolatedConfigDir::new();

        unsafe { std::env::remove_var("HUDDLE_DATABASE_URL") };
        unsafe { std::env::remove_var("HUDDLE_BASE_URL") };

        let config = HuddleConfig::resolve(None);
        assert_eq!(config.db_config.database_url, DbConfig::DEFAULT_URL);
        assert_eq!(config.share_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn share_link_joins_base_and_id() {
        let config = HuddleConfig {
            db_config: DbConfig::new(DbConfig::DEFAULT_URL),
            share_base_url: "https://plans.example.org/".to_string(),
        };
        assert_eq!(
            config.share_link("0a1b2c3d4e5f6071"),
            "https://plans.example.org/plan?id=0a1b2c3d4e5f6071"
        );
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("huddle/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
