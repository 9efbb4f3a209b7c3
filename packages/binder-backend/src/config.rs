/// Configuration for the binder backend.
/// Defaults, then an optional JSON file, then environment overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,
    /// Guard every load-mutate-save cycle with a mutex.
    #[serde(default)]
    pub serialize_writes: bool,
    /// Save through a temp file and rename instead of overwriting in place.
    #[serde(default)]
    pub atomic_writes: bool,
}

fn default_port() -> u16 {
    1337
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_state_file() -> PathBuf {
    PathBuf::from("/var/state/state.json")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("/var/state/images")
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_catalog_url() -> String {
    "https://api.scryfall.com".to_string()
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            state_file: default_state_file(),
            images_dir: default_images_dir(),
            dist_dir: default_dist_dir(),
            catalog_url: default_catalog_url(),
            catalog_timeout_secs: default_catalog_timeout_secs(),
            serialize_writes: false,
            atomic_writes: false,
        }
    }
}

/// Config file path: $BINDER_CONFIG, else ~/.config/binder/config.json
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("BINDER_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("binder")
        .join("config.json")
}

/// Load config from path. Returns default if the file is missing or invalid.
pub fn load_config(path: &Path) -> BackendConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config {}: {}", path.display(), e);
            BackendConfig::default()
        }),
        Err(_) => {
            log::info!("No config at {}, using defaults", path.display());
            BackendConfig::default()
        }
    }
}

fn parse_override<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

impl BackendConfig {
    /// Apply overrides from a variable lookup. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|v| parse_override("PORT", &v)) {
            self.port = port;
        }
        if let Some(path) = lookup("STATE_FILE") {
            self.state_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("IMAGES_DIR") {
            self.images_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("DIST_DIR") {
            self.dist_dir = PathBuf::from(path);
        }
        if let Some(url) = lookup("CATALOG_URL") {
            self.catalog_url = url;
        }
        if let Some(flag) =
            lookup("BINDER_SERIALIZE_WRITES").and_then(|v| parse_override("BINDER_SERIALIZE_WRITES", &v))
        {
            self.serialize_writes = flag;
        }
        if let Some(flag) =
            lookup("BINDER_ATOMIC_WRITES").and_then(|v| parse_override("BINDER_ATOMIC_WRITES", &v))
        {
            self.atomic_writes = flag;
        }
    }

    /// Config file at the default path with process environment applied.
    pub fn from_env() -> Self {
        let mut config = load_config(&default_config_path());
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.json"));
        assert_eq!(config, BackendConfig::default());
        assert_eq!(config.port, 1337);
        assert_eq!(config.state_file, PathBuf::from("/var/state/state.json"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "port": 9000, "atomic_writes": true }}"#).unwrap();
        let config = load_config(tmp.path());
        assert_eq!(config.port, 9000);
        assert!(config.atomic_writes);
        assert_eq!(config.images_dir, PathBuf::from("/var/state/images"));
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "port = 9000").unwrap();
        assert_eq!(load_config(tmp.path()), BackendConfig::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("STATE_FILE", "/tmp/state.json"),
            ("BINDER_SERIALIZE_WRITES", "true"),
            ("BINDER_ATOMIC_WRITES", "maybe"),
        ]
        .into_iter()
        .collect();

        let mut config = BackendConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.state_file, PathBuf::from("/tmp/state.json"));
        assert!(config.serialize_writes);
        assert!(!config.atomic_writes);
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = BackendConfig::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.port, 1337);
    }
}
