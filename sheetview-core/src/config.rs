//! Configuration file with default option values
//!
//! ```toml
//! [defaults]
//! max_cols = 20
//! mode = "exact"
//! format = "text"
//! delimiter = ";"
//! lang = "zh"
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};
use crate::messages::Language;
use crate::presenter::OutputFormat;
use crate::search::MatchMode;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "sheetview.toml";

/// Main viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewerConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Option defaults; unset keys fall back to the built-in values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    pub max_cols: Option<u32>,
    pub max_rows: Option<u32>,
    pub limit: Option<u32>,
    pub mode: Option<MatchMode>,
    pub case_sensitive: Option<bool>,
    pub format: Option<OutputFormat>,
    pub delimiter: Option<String>,
    pub lang: Option<Language>,
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ViewerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ViewerConfig =
            toml::from_str(&content).map_err(|source| ViewerError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicit config file, or `sheetview.toml` from the working
    /// directory when it exists, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reject values the command line would also reject
    pub fn validate(&self) -> Result<()> {
        let d = &self.defaults;
        for (key, value) in [
            ("max_cols", d.max_cols),
            ("max_rows", d.max_rows),
            ("limit", d.limit),
        ] {
            if value == Some(0) {
                return Err(ViewerError::InvalidConfig(format!(
                    "'{}' must be greater than 0",
                    key
                )));
            }
        }
        if let Some(delimiter) = &d.delimiter {
            parse_delimiter(delimiter).map_err(ViewerError::InvalidConfig)?;
        }
        Ok(())
    }
}

/// Parse a delimiter: one ASCII character other than a quote or line break
///
/// `\t` (backslash, t) is accepted as a tab.
pub fn parse_delimiter(raw: &str) -> std::result::Result<u8, String> {
    let c = match raw {
        "\\t" => '\t',
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(format!("delimiter must be a single character, got '{raw}'")),
            }
        }
    };
    if !c.is_ascii() || matches!(c, '"' | '\n' | '\r') {
        return Err(format!("unsupported delimiter '{}'", c.escape_default()));
    }
    Ok(c as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [defaults]
            max_cols = 20
            max_rows = 5
            limit = 3
            mode = "regex"
            case_sensitive = true
            format = "text"
            delimiter = ";"
            lang = "zh"
            "#,
        )
        .unwrap();
        let d = &config.defaults;
        assert_eq!(d.max_cols, Some(20));
        assert_eq!(d.mode, Some(MatchMode::Regex));
        assert_eq!(d.format, Some(OutputFormat::Text));
        assert_eq!(d.lang, Some(Language::Zh));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config() {
        let config: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = ViewerConfig::default();
        config.defaults.limit = Some(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ViewerError::InvalidConfig(_)));
        assert_eq!(err.exit_code(), 2);

        let mut config = ViewerConfig::default();
        config.defaults.delimiter = Some(";;".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheetview.toml");
        std::fs::write(&path, "[defaults]\nmax_colz = 3\n").unwrap();
        let err = ViewerConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_explicit_missing() {
        let err = ViewerConfig::load(Some(Path::new("/no/such/sheetview.toml"))).unwrap_err();
        assert!(matches!(err, ViewerError::ConfigRead { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[defaults]\nmode = \"exact\"\n").unwrap();
        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.defaults.mode, Some(MatchMode::Exact));
        assert_eq!(config.defaults.max_rows, None);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert_eq!(parse_delimiter("\t"), Ok(b'\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("；").is_err());
    }
}
