//! Settings parser for config.toml

use std::path::{Path, PathBuf};

use super::types::Settings;
use svcdbg_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "svcdbg";

/// `<config_dir>/svcdbg`, or `./svcdbg` where the platform has no config directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from `<config_dir>/config.toml`
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(config_dir: &Path) -> Settings {
    let config_path = config_dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Write a commented default config.toml unless one exists
pub fn init_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, generate_default_config())
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created default config at {:?}", config_path);
    }

    Ok(())
}

/// Save settings to `<config_dir>/config.toml`
///
/// Uses atomic write (temp file + rename).
pub fn save_settings(config_dir: &Path, settings: &Settings) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir)
            .map_err(|e| Error::config(format!("Failed to create config dir: {}", e)))?;
    }

    let config_path = config_dir.join(CONFIG_FILENAME);
    let temp_path = config_dir.join(".config.toml.tmp");

    let content = toml::to_string_pretty(settings)
        .map_err(|e| Error::config(format!("Failed to serialize settings: {}", e)))?;
    let full_content = format!("{}{}", generate_config_header(), content);

    std::fs::write(&temp_path, &full_content)
        .map_err(|e| Error::config(format!("Failed to write temp file: {}", e)))?;

    std::fs::rename(&temp_path, &config_path)
        .map_err(|e| Error::config(format!("Failed to rename temp file: {}", e)))?;

    info!("Saved settings to {:?}", config_path);
    Ok(())
}

fn generate_config_header() -> String {
    "# Service Debugger Configuration\n# Generated by svcdbg\n\n".to_string()
}

fn generate_default_config() -> String {
    r#"# Service Debugger Configuration

[gateway]
base_url = "http://localhost:6550/api"
catalog_timeout_ms = 2000     # list and describe calls
invoke_timeout_ms = 30000     # invocations
catalog_refresh_ms = 5000     # 0 disables periodic module refresh

[notifications]
expire_ms = 4000

[history]
limit = 1000
record = true                 # record every invocation

[ui]
show_path_hint = true
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_settings_defaults() {
        let temp = tempdir().unwrap();
        let settings = load_settings(temp.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_settings_custom() {
        let temp = tempdir().unwrap();
        let config = r#"
[gateway]
base_url = "http://gw:9000/api"
invoke_timeout_ms = 120000

[history]
record = false
"#;
        std::fs::write(temp.path().join("config.toml"), config).unwrap();

        let settings = load_settings(temp.path());

        assert_eq!(settings.gateway.base_url, "http://gw:9000/api");
        assert_eq!(settings.gateway.invoke_timeout_ms, 120_000);
        assert_eq!(settings.gateway.catalog_timeout_ms, 2_000);
        assert!(!settings.history.record);
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("config.toml"), "not valid toml {{{{").unwrap();

        let settings = load_settings(temp.path());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_config_dir() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("svcdbg");

        init_config_dir(&dir).unwrap();

        let content = std::fs::read_to_string(dir.join("config.toml")).unwrap();
        let parsed: Settings = toml::from_str(&content).expect("Default config should be valid TOML");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_init_config_dir_idempotent() {
        let temp = tempdir().unwrap();
        init_config_dir(temp.path()).unwrap();

        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "[history]\nlimit = 5\n").unwrap();

        init_config_dir(temp.path()).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("limit = 5"));
    }

    #[test]
    fn test_save_settings_roundtrip() {
        let temp = tempdir().unwrap();

        let mut settings = Settings::default();
        settings.gateway.base_url = "http://other/api".to_string();
        settings.notifications.expire_ms = 10_000;
        settings.ui.show_path_hint = false;

        save_settings(temp.path(), &settings).unwrap();
        let loaded = load_settings(temp.path());

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_save_settings_atomic_write() {
        let temp = tempdir().unwrap();
        save_settings(temp.path(), &Settings::default()).unwrap();

        assert!(!temp.path().join(".config.toml.tmp").exists());
        let content = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
        assert!(content.starts_with("# Service Debugger Configuration"));
    }

    #[test]
    fn test_save_settings_creates_directory() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("nested").join("svcdbg");
        save_settings(&dir, &Settings::default()).unwrap();
        assert!(dir.join("config.toml").exists());
    }
}
