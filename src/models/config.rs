use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Where finished posts are submitted
    #[serde(default)]
    pub post_service: PostServiceConfig,

    /// Tags attached to every post, ahead of the location tag
    #[serde(default = "default_tags")]
    pub default_tags: Vec<String>,

    /// Directory the gallery picker lists (most recent image wins)
    #[serde(default)]
    pub gallery_dir: Option<PathBuf>,

    /// Directory camera captures are written to
    #[serde(default)]
    pub capture_dir: Option<PathBuf>,

    /// Append "(Applied Filter: N)" to the submitted caption
    #[serde(default = "default_annotate_filter")]
    pub annotate_filter: bool,
}

fn default_tags() -> Vec<String> {
    vec!["revdup".to_string(), "car".to_string()]
}

fn default_annotate_filter() -> bool {
    true
}

/// Connection settings for the post service
#[derive(Debug, Deserialize, Clone)]
pub struct PostServiceConfig {
    /// Base URL; posts go to `{base_url}/posts`
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token sent with each request
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for PostServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout(),
            auth_token: None,
        }
    }
}

/// Settings the post flow needs when it builds a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowOptions {
    pub default_tags: Vec<String>,
    pub annotate_filter: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            default_tags: default_tags(),
            annotate_filter: default_annotate_filter(),
        }
    }
}

impl AppConfig {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration, falling back to defaults on any problem.
    ///
    /// `path` wins over the `CONFIG_FILE` environment variable. Environment
    /// overrides (`POST_SERVICE_URL`, `POST_SERVICE_TOKEN`) are applied last.
    pub fn load(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        tags = config.default_tags.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to load config, using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("POST_SERVICE_URL") {
            self.post_service.base_url = Some(url);
        }
        if let Some(token) = var("POST_SERVICE_TOKEN") {
            self.post_service.auth_token = Some(token);
        }
    }

    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions {
            default_tags: self.default_tags.clone(),
            annotate_filter: self.annotate_filter,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            post_service: PostServiceConfig::default(),
            default_tags: default_tags(),
            gallery_dir: None,
            capture_dir: None,
            annotate_filter: default_annotate_filter(),
        }
    }
}
