//! Process configuration: environment and JSON files

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::formula::{FormulaConfig, FormulaOverrides};
use crate::strategy::advisory::DEFAULT_ADVISORY_TIMEOUT;
use crate::strategy::HttpAdvisoryClient;

pub const ADVISORY_URL_ENV: &str = "IRONPLAN_ADVISORY_URL";
pub const ADVISORY_KEY_ENV: &str = "IRONPLAN_ADVISORY_KEY";
pub const ADVISORY_TIMEOUT_ENV: &str = "IRONPLAN_ADVISORY_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub advisory_url: Option<String>,
    pub advisory_key: Option<String>,
    pub advisory_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            advisory_url: None,
            advisory_key: None,
            advisory_timeout: DEFAULT_ADVISORY_TIMEOUT,
        }
    }
}

impl AppConfig {
    /// Read from the process environment (call `dotenvy::dotenv()` first)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let advisory_timeout = match non_empty(ADVISORY_TIMEOUT_ENV) {
            Some(raw) => {
                let ms: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} must be milliseconds, got {:?}", ADVISORY_TIMEOUT_ENV, raw))?;
                Duration::from_millis(ms)
            }
            None => DEFAULT_ADVISORY_TIMEOUT,
        };

        Ok(Self {
            advisory_url: non_empty(ADVISORY_URL_ENV),
            advisory_key: non_empty(ADVISORY_KEY_ENV),
            advisory_timeout,
        })
    }

    /// HTTP advisor, when an endpoint is configured
    pub fn advisory_client(&self) -> Option<HttpAdvisoryClient> {
        self.advisory_url
            .as_ref()
            .map(|url| HttpAdvisoryClient::new(url.clone(), self.advisory_key.clone()))
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

/// System defaults merged with an optional overrides file
pub fn load_formula_config(overrides: Option<&Path>) -> Result<FormulaConfig> {
    let base = FormulaConfig::default();
    match overrides {
        Some(path) => {
            let overrides: FormulaOverrides = load_json(path)?;
            Ok(base.merged(&overrides)?)
        }
        None => Ok(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ironplan-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_env() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(cfg.advisory_client().is_none());
    }

    #[test]
    fn test_reads_advisory_settings() {
        let cfg = AppConfig::from_lookup(lookup(&[
            (ADVISORY_URL_ENV, "http://localhost:9000/advise"),
            (ADVISORY_KEY_ENV, "k"),
            (ADVISORY_TIMEOUT_ENV, "2500"),
        ]))
        .unwrap();
        assert_eq!(cfg.advisory_timeout, Duration::from_millis(2500));
        assert_eq!(cfg.advisory_key.as_deref(), Some("k"));
        assert_eq!(
            cfg.advisory_client().unwrap().endpoint(),
            "http://localhost:9000/advise"
        );
    }

    #[test]
    fn test_blank_values_ignored() {
        let cfg = AppConfig::from_lookup(lookup(&[(ADVISORY_URL_ENV, "  ")])).unwrap();
        assert!(cfg.advisory_url.is_none());
    }

    #[test]
    fn test_bad_timeout_is_error() {
        assert!(AppConfig::from_lookup(lookup(&[(ADVISORY_TIMEOUT_ENV, "soon")])).is_err());
    }

    #[test]
    fn test_load_formula_overrides() {
        let path = temp_file("overrides.json", r#"{"block1": {"heavy": {"percent": 0.82}}}"#);
        let cfg = load_formula_config(Some(&path)).unwrap();
        assert_eq!(cfg.block1.heavy.percent, 0.82);
        assert_eq!(cfg.block2, FormulaConfig::default().block2);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_json::<FormulaOverrides>(Path::new("/nonexistent/ironplan.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/ironplan.json"));
    }
}
