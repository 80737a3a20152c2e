// src/config/mod.rs
//! Loading `AnalyzerConfig` from TOML or JSON files.
//!
//! Resolution order for `load_default()`:
//! 1) $COMPLAINT_CONFIG_PATH (must exist)
//! 2) config/analyzer.toml
//! 3) config/analyzer.json
//! 4) built-in defaults

pub mod analyzer;

pub use analyzer::{
    AnalyzerConfig, CategoryKeywords, PreprocessingConfig, PriorityPolicy, SentimentThresholds,
};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ConfigError;

pub const ENV_CONFIG_PATH: &str = "COMPLAINT_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/analyzer.toml";
pub const DEFAULT_JSON_PATH: &str = "config/analyzer.json";

/// Load and validate a config file; the extension picks the format.
pub fn load_from(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg = match ext.as_str() {
        "toml" => from_toml_str(&content)?,
        "json" => from_json_str(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    info!(path = %path.display(), categories = cfg.categories.len(), "loaded analyzer config");
    Ok(cfg)
}

/// Env var first, then the conventional paths, then defaults.
pub fn load_default() -> Result<AnalyzerConfig, ConfigError> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(ConfigError::Invalid(format!(
                "{ENV_CONFIG_PATH} points to non-existent path {}",
                pb.display()
            )));
        }
        return load_from(&pb);
    }
    for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return load_from(&pb);
        }
    }
    info!("no analyzer config file found, using built-in defaults");
    Ok(AnalyzerConfig::default())
}

pub fn from_toml_str(s: &str) -> Result<AnalyzerConfig, ConfigError> {
    let cfg: AnalyzerConfig = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn from_json_str(s: &str) -> Result<AnalyzerConfig, ConfigError> {
    let cfg: AnalyzerConfig = serde_json::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_agree() {
        let t = from_toml_str(
            r#"
keyword_count = 7
urgency_terms = ["recall"]
"#,
        )
        .unwrap();
        let j = from_json_str(r#"{"keyword_count": 7, "urgency_terms": ["recall"]}"#).unwrap();
        assert_eq!(t, j);
    }

    #[test]
    fn invalid_values_fail_at_load_time() {
        let err = from_toml_str("keyword_count = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = from_json_str("{\"keyword_count\": \"five\"}").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("analyzer.yaml");
        fs::write(&p, "keyword_count: 3").unwrap();
        let err = load_from(&p).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref e) if e == "yaml"));
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so the repo's own config/ is not picked up
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);

        let v = load_default().unwrap();
        assert_eq!(v, AnalyzerConfig::default());

        let cfg_dir = tmp.path().join("config");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(cfg_dir.join("analyzer.json"), r#"{"keyword_count": 2}"#).unwrap();
        assert_eq!(load_default().unwrap().keyword_count, 2);

        // TOML wins over JSON
        fs::write(cfg_dir.join("analyzer.toml"), "keyword_count = 4").unwrap();
        assert_eq!(load_default().unwrap().keyword_count, 4);

        // Env has priority
        let p_env = tmp.path().join("custom.toml");
        fs::write(&p_env, "keyword_count = 9").unwrap();
        env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
        assert_eq!(load_default().unwrap().keyword_count, 9);

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(load_default().is_err());
        env::remove_var(ENV_CONFIG_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
