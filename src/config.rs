use crate::text::WordLimits;
use crate::tooltip::TooltipOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a registry url must be provided (set `url` in the config or pass --url)")]
    MissingUrl,
    #[error("invalid registry url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub url: Option<String>,
    #[serde(alias = "definitionWords")]
    pub definition_words: usize,
    #[serde(alias = "longDefinitionWords")]
    pub long_definition_words: usize,
    pub placement: Placement,
    #[serde(alias = "externalLinkVisible")]
    pub external_link_visible: bool,
    pub theme: Theme,
    pub timeout_secs: u64,
    pub items: Vec<ItemConfig>,
}

/// A decorated element: the registry item it explains and how it is labelled.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ItemConfig {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl ItemConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Placement {
    pub fn opposite(self) -> Self {
        match self {
            Placement::Top => Placement::Bottom,
            Placement::Bottom => Placement::Top,
            Placement::Left => Placement::Right,
            Placement::Right => Placement::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Light,
    #[default]
    LightBorder,
    Material,
    Translucent,
    Dark,
}

impl Default for Config {
    fn default() -> Self {
        let limits = WordLimits::default();
        Self {
            url: None,
            definition_words: limits.short,
            long_definition_words: limits.long,
            placement: Placement::default(),
            external_link_visible: true,
            theme: Theme::default(),
            timeout_secs: 20,
            items: Vec::new(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aristotle-tooltip").join("config.toml"))
    }

    /// Load `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the configured registry URL with one given on the command line.
    pub fn override_url(&mut self, url: Option<String>) {
        if url.is_some() {
            self.url = url;
        }
    }

    /// Warn when no registry URL is set. Call once every source is merged.
    pub fn warn_if_incomplete(&self) -> bool {
        let missing = self.url.as_deref().map_or(true, |url| url.trim().is_empty());
        if missing {
            warn!("a registry url must be provided as an option");
        }
        missing
    }

    /// Validated absolute http(s) base URL of the registry.
    pub fn registry_url(&self) -> Result<Url, ConfigError> {
        let raw = self.url.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(ConfigError::MissingUrl);
        }
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_string()));
        }
        Ok(url)
    }

    pub fn word_limits(&self) -> WordLimits {
        WordLimits {
            short: self.definition_words,
            long: self.long_definition_words,
        }
    }

    pub fn tooltip_options(&self) -> TooltipOptions {
        TooltipOptions {
            limits: self.word_limits(),
            external_link_visible: self.external_link_visible,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.url, None);
        assert_eq!(config.definition_words, 50);
        assert_eq!(config.long_definition_words, 75);
        assert_eq!(config.placement, Placement::Bottom);
        assert!(config.external_link_visible);
        assert_eq!(config.theme, Theme::LightBorder);
    }

    #[test]
    fn test_load_snake_case() {
        let file = write_config(
            r#"
url = "https://registry.aristotlemetadata.com"
definition_words = 20
long_definition_words = 40
placement = "top"
external_link_visible = false
theme = "material"

[[items]]
id = "9"
label = "Age"

[[items]]
id = "10"
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.word_limits(), WordLimits { short: 20, long: 40 });
        assert_eq!(config.placement, Placement::Top);
        assert!(!config.external_link_visible);
        assert_eq!(config.theme, Theme::Material);
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].label(), "Age");
        assert_eq!(config.items[1].label(), "10");
    }

    #[test]
    fn test_load_camel_case_aliases() {
        let file = write_config(
            r#"
url = "https://registry.aristotlemetadata.com"
definitionWords = 10
longDefinitionWords = 30
externalLinkVisible = false
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.definition_words, 10);
        assert_eq!(config.long_definition_words, 30);
        assert!(!config.external_link_visible);
        assert_eq!(config.placement, Placement::Bottom);
    }

    #[test]
    fn test_missing_url_loads_but_cannot_fetch() {
        let file = write_config("theme = \"dark\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert!(matches!(config.registry_url(), Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn test_url_override_satisfies_missing_url() {
        let file = write_config("theme = \"dark\"\n");
        let mut config = Config::load(Some(file.path())).unwrap();
        assert!(config.warn_if_incomplete());

        config.override_url(Some("https://registry.example".to_string()));
        assert!(!config.warn_if_incomplete());
        assert_eq!(
            config.registry_url().unwrap().host_str(),
            Some("registry.example")
        );
    }

    #[test]
    fn test_absent_override_keeps_file_url() {
        let file = write_config("url = \"https://from-file.example\"\n");
        let mut config = Config::load(Some(file.path())).unwrap();
        config.override_url(None);
        assert!(!config.warn_if_incomplete());
        assert_eq!(config.url.as_deref(), Some("https://from-file.example"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("placement = \"sideways\"\n");
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_registry_url_validation() {
        let with_url = |url: &str| Config {
            url: Some(url.to_string()),
            ..Config::default()
        };

        let url = with_url("https://registry.aristotlemetadata.com")
            .registry_url()
            .unwrap();
        assert_eq!(url.host_str(), Some("registry.aristotlemetadata.com"));

        for bad in [
            "registry.aristotlemetadata.com",
            "/api",
            "ftp://registry.example",
            "mailto:someone@example.com",
            "   ",
        ] {
            assert!(with_url(bad).registry_url().is_err(), "accepted {bad:?}");
        }
    }
}
