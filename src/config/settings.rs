//! Settings structures for rpg-search configuration

use crate::collections::Collection;
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lowercase, no separators or wildcards, not starting with `-`, `_` or `+`
static INDEX_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("valid index name pattern"));

/// Main settings structure loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub elasticsearch: ElasticsearchSettings,
    pub collections: CollectionsSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with environment variables (RPG_SEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RPG_SEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("RPG_SEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("RPG_SEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("RPG_SEARCH_ELASTICSEARCH_URL") {
            self.elasticsearch.url = val;
        }
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.elasticsearch.url)
            .with_context(|| format!("invalid elasticsearch url '{}'", self.elasticsearch.url))?;

        let timeout = self.elasticsearch.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            bail!(
                "elasticsearch.request_timeout must be a positive number of seconds, got {}",
                timeout
            );
        }

        for collection in Collection::ALL {
            let index = self.collections.index_for(collection);
            if !INDEX_NAME.is_match(index) {
                bail!("invalid index name '{}' for {}", index, collection);
            }
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported on the index route
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "RPG Search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Connection to the search engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchSettings {
    /// Base URL of the cluster
    pub url: String,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Idle connections kept per host
    pub pool_maxsize: usize,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            request_timeout: 30.0,
            pool_maxsize: 10,
            username: None,
            password: None,
        }
    }
}

/// Index name of each collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsSettings {
    pub items: String,
    pub characters: String,
    pub missions: String,
}

impl CollectionsSettings {
    pub fn index_for(&self, collection: Collection) -> &str {
        match collection {
            Collection::Items => &self.items,
            Collection::Characters => &self.characters,
            Collection::Missions => &self.missions,
        }
    }
}

impl Default for CollectionsSettings {
    fn default() -> Self {
        Self {
            items: Collection::Items.schema().default_index.to_string(),
            characters: Collection::Characters.schema().default_index.to_string(),
            missions: Collection::Missions.schema().default_index.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.elasticsearch.url, "http://localhost:9200");
        assert_eq!(settings.collections.index_for(Collection::Items), "rpg_itens");
        assert_eq!(
            settings.collections.index_for(Collection::Missions),
            "rpg_missoes"
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
server:
  port: 8080
elasticsearch:
  url: "http://es.internal:9200"
  username: elastic
collections:
  characters: heroes_v2
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.elasticsearch.username.as_deref(), Some("elastic"));
        assert_eq!(settings.elasticsearch.request_timeout, 30.0);
        assert_eq!(settings.collections.characters, "heroes_v2");
        assert_eq!(settings.collections.items, "rpg_itens");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.collections.items = "Bad Index".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.collections.missions = "_hidden".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.elasticsearch.url = "not a url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.elasticsearch.request_timeout = 0.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_infinite_timeout() {
        let yaml = "elasticsearch:\n  request_timeout: .inf\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert!(settings.elasticsearch.request_timeout.is_infinite());
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.elasticsearch.request_timeout = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("rpg-search-{}.yml", std::process::id()));
        std::fs::write(&path, "general:\n  instance_name: Taverna\n").unwrap();

        let settings = Settings::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.general.instance_name, "Taverna");
        assert!(!settings.general.debug);
        assert!(Settings::from_file("/nonexistent/settings.yml").is_err());
    }
}
