use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Process-wide document settings.
///
/// Everything here is applied uniformly to the root document and shared unchanged by
/// every per-resource document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocConfig {
    /// API title shown in `info`
    pub title: String,
    /// API version shown in `info`
    pub version: String,
    /// Schema version literal emitted as `swagger`
    pub swagger: String,
    /// Content types the API as a whole supports
    pub produces: Vec<String>,
    pub host: Option<String>,
    pub schemes: Vec<String>,
    /// Documentation endpoints live at `<mount_path>.json` and `<mount_path>/<key>.json`
    pub mount_path: String,
    /// Primary status code for methods other than GET, HEAD and POST
    pub default_status: u16,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            title: "API title".to_string(),
            version: "v1".to_string(),
            swagger: "2.0".to_string(),
            produces: vec![
                "application/xml".to_string(),
                "application/json".to_string(),
                "application/octet-stream".to_string(),
                "text/plain".to_string(),
            ],
            host: None,
            schemes: Vec::new(),
            mount_path: "/swagger_doc".to_string(),
            default_status: 200,
        }
    }
}

/// Values given on the command line, which take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub title: Option<String>,
    pub version: Option<String>,
    pub host: Option<String>,
    pub schemes: Vec<String>,
}

impl DocConfig {
    /// Load settings from a YAML or JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON config: {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML config: {}", path.display()))?,
        };

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(version) = overrides.version {
            self.version = version;
        }
        if overrides.host.is_some() {
            self.host = overrides.host;
        }
        if !overrides.schemes.is_empty() {
            self.schemes = overrides.schemes;
        }
        self
    }
}
