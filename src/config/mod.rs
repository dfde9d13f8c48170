pub mod types;

use crate::error::ConfigError;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

pub use types::Config;

const CONFIG_FILE_NAME: &str = ".dockerfile-optimizer.toml";

/// Get the global config file path (~/.dockerfile-optimizer.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.dockerfile-optimizer.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Parse a config file, failing on any error.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load configuration.
///
/// An explicit path must load. Otherwise the local config in `dir` is tried,
/// then the global one; unreadable implicit files are skipped with a warning.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let candidates = std::iter::once(local_config_path(dir)).chain(global_config_path());
    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        match load_config_file(&candidate) {
            Ok(config) => return Ok(config),
            Err(e) => warn!("ignoring {}", e),
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Severity;
    use crate::analyzer::formatter::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
min_severity = "medium"
ignore_rules = ["DFO007"]
"#,
        )
        .unwrap();
        assert_eq!(config.min_severity, Severity::Medium);
        assert_eq!(config.ignore_rules, vec!["DFO007"]);
        assert_eq!(config.format, OutputFormat::Tty);
        assert!(config.color);
    }

    #[test]
    fn test_local_config_preferred() {
        let dir = TempDir::new().unwrap();
        fs::write(local_config_path(dir.path()), "format = \"json\"\n").unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_explicit_config_must_parse() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "min_severity = 3\n").unwrap();
        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_explicit_config_missing() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml")), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
