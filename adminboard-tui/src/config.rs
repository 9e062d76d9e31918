//! Configuration loading for the adminboard TUI.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use adminboard_core::menu::{self, MenuItem};
use adminboard_core::TableMode;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Menu target that opens the summary view instead of a resource.
pub const DASHBOARD_TARGET: &str = "dashboard";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub tick_rate_ms: u64,
    pub state_path: PathBuf,
    pub log_path: PathBuf,
    pub user_role: String,
    #[serde(default)]
    pub auth: AuthConfig,
    pub hierarchy: HierarchyConfig,
    pub resources: Vec<ResourceConfig>,
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HierarchyConfig {
    /// REST path returning the node array.
    pub path: Option<String>,
    /// Local JSON file used instead of `path`.
    pub fixture: Option<PathBuf>,
    /// Store key for the selected node id.
    pub selection_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceConfig {
    pub key: String,
    pub title: String,
    pub path: Option<String>,
    pub fixture: Option<PathBuf>,
    pub id_field: String,
    pub page_size: usize,
    pub mode: TableMode,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or ADMINBOARD_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl AdminConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file. Relative fixture paths resolve against the
    /// file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&contents)?;
        if let Some(base) = path.parent() {
            config.resolve_fixtures(base);
        }
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn resolve_fixtures(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(fixture) = self.hierarchy.fixture.as_mut() {
            resolve(fixture);
        }
        for resource in &mut self.resources {
            if let Some(fixture) = resource.fixture.as_mut() {
                resolve(fixture);
            }
        }
    }

    pub fn resource(&self, key: &str) -> Option<&ResourceConfig> {
        self.resources.iter().find(|r| r.key == key)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.tick_rate_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.state_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "state_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.log_path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.user_role.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "user_role",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(token) = &self.auth.bearer_token {
            if token.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "auth.bearer_token",
                    reason: "must not be empty when set".to_string(),
                });
            }
        }
        if self.hierarchy.selection_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "hierarchy.selection_key",
                reason: "must not be empty".to_string(),
            });
        }
        if self.hierarchy.path.is_some() && self.hierarchy.fixture.is_some() {
            return Err(ConfigError::InvalidValue {
                field: "hierarchy",
                reason: "set path or fixture, not both".to_string(),
            });
        }

        let mut keys = HashSet::new();
        for resource in &self.resources {
            if resource.key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "resources.key",
                    reason: "must not be empty".to_string(),
                });
            }
            if resource.key == DASHBOARD_TARGET {
                return Err(ConfigError::InvalidValue {
                    field: "resources.key",
                    reason: format!("'{}' is reserved", DASHBOARD_TARGET),
                });
            }
            if !keys.insert(resource.key.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "resources.key",
                    reason: format!("duplicate key '{}'", resource.key),
                });
            }
            if resource.id_field.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "resources.id_field",
                    reason: format!("must not be empty for '{}'", resource.key),
                });
            }
            if resource.page_size == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "resources.page_size",
                    reason: format!("must be > 0 for '{}'", resource.key),
                });
            }
            match (&resource.path, &resource.fixture) {
                (None, None) => {
                    return Err(ConfigError::InvalidValue {
                        field: "resources.path",
                        reason: format!("'{}' needs a path or a fixture", resource.key),
                    });
                }
                (Some(_), Some(_)) => {
                    return Err(ConfigError::InvalidValue {
                        field: "resources.path",
                        reason: format!("'{}' sets both path and fixture", resource.key),
                    });
                }
                _ => {}
            }
        }

        for target in menu::targets(&self.menu) {
            if target != DASHBOARD_TARGET && !keys.contains(target) {
                return Err(ConfigError::InvalidValue {
                    field: "menu.target",
                    reason: format!("unknown target '{}'", target),
                });
            }
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("ADMINBOARD_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
