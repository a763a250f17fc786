//! Persisted defaults in `config.ini`.
//!
//! ```ini
//! [go]
//! binary = /usr/local/go/bin/go
//!
//! [link]
//! skip_bin = false
//! skip_build_cache = true
//! skip_modules = false
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Errors reading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("failed to load config file {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// A value has the wrong type.
    #[error("invalid value {value:?} for {key}: expected true or false")]
    InvalidBool { key: String, value: String },
}

/// `[go]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoSettings {
    /// go binary used as the resolver. `None` means `go` from `PATH`.
    pub binary: Option<PathBuf>,
}

/// `[link]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSettings {
    pub skip_bin: bool,
    pub skip_build_cache: bool,
    pub skip_modules: bool,
}

/// Contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub go: GoSettings,
    pub link: LinkSettings,
}

/// Location of the config file (`<config dir>/vgopath/config.ini`).
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vgopath")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(go) = ini.section(Some("go")) {
            config.go.binary = go
                .get("binary")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }

        if let Some(link) = ini.section(Some("link")) {
            let flag = |key: &str| -> Result<bool, ConfigError> {
                link.get(key)
                    .map_or(Ok(false), |v| parse_bool(&format!("link.{}", key), v))
            };
            config.link.skip_bin = flag("skip_bin")?;
            config.link.skip_build_cache = flag("skip_build_cache")?;
            config.link.skip_modules = flag("skip_modules")?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
