//! Application configuration (`aurum.toml`).

use crate::error::{Result, StorefrontError};
use aurum_api::{ApiConfig, RetryPolicy};
use aurum_commerce::checkout::{
    ShippingPolicy, DEFAULT_FLAT_SHIPPING_RATE, DEFAULT_FREE_SHIPPING_THRESHOLD,
};
use aurum_commerce::search::DEFAULT_PER_PAGE;
use aurum_commerce::Money;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names looked up when no explicit path is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["aurum.toml", ".aurum.toml", "aurum.json"];

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "AURUM_API_URL";
/// Overrides `storage.dir`.
pub const ENV_STORAGE_DIR: &str = "AURUM_STORAGE_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AurumConfig {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub shop: ShopSection,
}

/// `[api]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for failed reads.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory holding `local.json`. Defaults to `~/.local/share/aurum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// `[shop]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSection {
    /// Subtotal (CLP) above which shipping is free.
    #[serde(default = "default_free_threshold")]
    pub free_shipping_threshold: i64,

    /// Shipping charged below the threshold (CLP).
    #[serde(default = "default_flat_rate")]
    pub flat_shipping_rate: i64,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Lifetime of the cached product listing.
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: i64,
}

fn default_free_threshold() -> i64 {
    DEFAULT_FREE_SHIPPING_THRESHOLD
}

fn default_flat_rate() -> i64 {
    DEFAULT_FLAT_SHIPPING_RATE
}

fn default_page_size() -> usize {
    DEFAULT_PER_PAGE
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_catalog_ttl() -> i64 {
    5 * 60
}

impl Default for ShopSection {
    fn default() -> Self {
        Self {
            free_shipping_threshold: default_free_threshold(),
            flat_shipping_rate: default_flat_rate(),
            page_size: default_page_size(),
            search_debounce_ms: default_debounce_ms(),
            catalog_ttl_secs: default_catalog_ttl(),
        }
    }
}

impl AurumConfig {
    /// Load config from a TOML or JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StorefrontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, is_json(path))
            .map_err(|e| StorefrontError::Config(format!("{}: {e}", path.display())))
    }

    fn parse(content: &str, json: bool) -> std::result::Result<Self, String> {
        if json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        }
    }

    /// Save config to a file, TOML unless the extension is `.json`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| StorefrontError::Config(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| StorefrontError::Config(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|source| StorefrontError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `start` or its parents.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load from an explicit path, a discovered file, or defaults; then apply
    /// environment overrides.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::discover(cwd) {
                Some(path) => {
                    tracing::debug!(path = %path.display(), "using discovered config");
                    Self::load(path)?
                }
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `AURUM_*` overrides from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            self.storage.dir = Some(PathBuf::from(dir.trim()));
        }
    }

    /// Check value ranges. Returns every problem found.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut problems = Vec::new();
        let base = self.api.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            problems.push(format!("api.base_url debe ser http(s): {base}"));
        }
        if self.api.timeout_secs == 0 {
            problems.push("api.timeout_secs debe ser mayor que 0".to_string());
        }
        if self.shop.free_shipping_threshold < 0 {
            problems.push("shop.free_shipping_threshold no puede ser negativo".to_string());
        }
        if self.shop.flat_shipping_rate < 0 {
            problems.push("shop.flat_shipping_rate no puede ser negativo".to_string());
        }
        if !(1..=100).contains(&self.shop.page_size) {
            problems.push("shop.page_size debe estar entre 1 y 100".to_string());
        }
        if self.shop.catalog_ttl_secs <= 0 {
            problems.push("shop.catalog_ttl_secs debe ser mayor que 0".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.api.base_url.clone())
            .with_timeout(Duration::from_secs(self.api.timeout_secs))
            .with_retry(RetryPolicy::new(self.api.max_retries))
    }

    pub fn shipping_policy(&self) -> ShippingPolicy {
        ShippingPolicy::new(
            Money::clp(self.shop.free_shipping_threshold),
            Money::clp(self.shop.flat_shipping_rate),
        )
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.shop.search_debounce_ms)
    }

    pub fn catalog_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.shop.catalog_ttl_secs)
    }

    /// Directory for persisted local state.
    pub fn storage_dir(&self) -> PathBuf {
        match &self.storage.dir {
            Some(dir) => dir.clone(),
            None => match std::env::var_os("HOME") {
                Some(home) => PathBuf::from(home).join(".local").join("share").join("aurum"),
                None => std::env::temp_dir().join("aurum"),
            },
        }
    }

    /// The file backing local storage.
    pub fn local_store_path(&self) -> PathBuf {
        self.storage_dir().join("local.json")
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Commented template written by `aurum config init`.
pub fn default_config_template() -> String {
    format!(
        r#"# Aurum storefront configuration

[api]
base_url = "{base_url}"
timeout_secs = {timeout}
max_retries = {retries}

[storage]
# dir = "/var/lib/aurum"

[shop]
free_shipping_threshold = {threshold}
flat_shipping_rate = {rate}
page_size = {page_size}
search_debounce_ms = {debounce}
catalog_ttl_secs = {ttl}
"#,
        base_url = default_base_url(),
        timeout = default_timeout_secs(),
        retries = default_max_retries(),
        threshold = DEFAULT_FREE_SHIPPING_THRESHOLD,
        rate = DEFAULT_FLAT_SHIPPING_RATE,
        page_size = DEFAULT_PER_PAGE,
        debounce = default_debounce_ms(),
        ttl = default_catalog_ttl(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed = AurumConfig::parse(&default_config_template(), false).unwrap();
        assert_eq!(parsed, AurumConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = AurumConfig::parse("[shop]\npage_size = 24\n", false).unwrap();
        assert_eq!(parsed.shop.page_size, 24);
        assert_eq!(parsed.shop.free_shipping_threshold, 50_000);
        assert_eq!(parsed.api.max_retries, 2);
    }

    #[test]
    fn test_json_config() {
        let parsed =
            AurumConfig::parse(r#"{"api": {"base_url": "https://tienda.cl/api"}}"#, true).unwrap();
        assert_eq!(parsed.api.base_url, "https://tienda.cl/api");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AurumConfig::default();
        config.apply_overrides(|key| match key {
            ENV_API_URL => Some(" https://api.aurum.cl ".to_string()),
            ENV_STORAGE_DIR => Some("/tmp/aurum-test".to_string()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://api.aurum.cl");
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/aurum-test"));
        assert_eq!(
            config.local_store_path(),
            PathBuf::from("/tmp/aurum-test/local.json")
        );
    }

    #[test]
    fn test_blank_override_ignored() {
        let mut config = AurumConfig::default();
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, default_base_url());
        assert_eq!(config.storage.dir, None);
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut config = AurumConfig::default();
        assert!(config.validate().is_ok());
        config.api.base_url = "localhost".to_string();
        config.shop.page_size = 0;
        let problems = config.validate().unwrap_err();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aurum.toml");
        let mut config = AurumConfig::default();
        config.shop.flat_shipping_rate = 3_990;
        config.save(&path).unwrap();

        assert_eq!(AurumConfig::load(&path).unwrap(), config);
        assert_eq!(AurumConfig::discover(dir.path()), Some(path));
    }

    #[test]
    fn test_shipping_policy_from_config() {
        let policy = AurumConfig::default().shipping_policy();
        assert_eq!(policy.cost_for(&Money::clp(50_001)), Money::clp(0));
        assert_eq!(policy.cost_for(&Money::clp(50_000)), Money::clp(5_000));
    }
}
