use crate::error::ConnectorError;
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SERVER_KEY: &str = "server";
pub const USER_KEY: &str = "user";
pub const PASSWORD_KEY: &str = "password";
pub const TARGET_DIRECTORY_KEY: &str = "target_directory";

pub const DEFAULT_CONFIG_FILE: &str = "perforce-connector.toml";

/// Raw parameters handed to a connector by its host, stored verbatim.
pub type Params = BTreeMap<String, String>;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ConnectionParameters {
    /// Perforce server address, e.g. `ssl:perforce.example.com:1666`.
    pub server: String,
    pub user: String,
    pub password: String,
    /// Local directory that `p4 sync` runs in.
    pub target_directory: PathBuf,
}

impl ConnectionParameters {
    /// Resolves the required keys, failing on the first one that is absent.
    pub fn from_params(params: &Params) -> Result<Self, ConnectorError> {
        Ok(Self {
            server: lookup(params, SERVER_KEY)?,
            user: lookup(params, USER_KEY)?,
            password: lookup(params, PASSWORD_KEY)?,
            target_directory: PathBuf::from(lookup(params, TARGET_DIRECTORY_KEY)?),
        })
    }

    pub fn into_params(self) -> Params {
        Params::from([
            (SERVER_KEY.to_string(), self.server),
            (USER_KEY.to_string(), self.user),
            (PASSWORD_KEY.to_string(), self.password),
            (
                TARGET_DIRECTORY_KEY.to_string(),
                self.target_directory.to_string_lossy().into_owned(),
            ),
        ])
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let config = toml::to_string_pretty(self).context("cannot serialize config")?;
        std::fs::write(path, config).context("cannot write config")?;
        Ok(())
    }
}

fn lookup(params: &Params, key: &str) -> Result<String, ConnectorError> {
    params
        .get(key)
        .cloned()
        .ok_or_else(|| ConnectorError::MissingParameter {
            key: key.to_string(),
        })
}

/// Loads a flat TOML table of string values as a parameter map.
///
/// Unknown keys are kept; missing required keys are only reported when the
/// connector fetches.
pub fn load_params(path: &Path) -> anyhow::Result<Params> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("cannot load config file from {}", path.display()))?;
    let params: Params = toml::from_str(&data).context("cannot load config as TOML")?;
    Ok(params)
}

/// Values given on the command line or through the environment. Each one
/// that is set replaces the corresponding config file entry.
#[derive(Default, Debug)]
pub struct ParamOverrides {
    pub server: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub target_directory: Option<PathBuf>,
}

impl ParamOverrides {
    pub fn apply(self, params: &mut Params) {
        let overrides = [
            (SERVER_KEY, self.server),
            (USER_KEY, self.user),
            (PASSWORD_KEY, self.password),
            (
                TARGET_DIRECTORY_KEY,
                self.target_directory
                    .map(|dir| dir.to_string_lossy().into_owned()),
            ),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        }
    }
}

/// Platform config directory, e.g. `~/.config/perforce-connector` on Linux.
pub fn global_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "perforce-connector")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Picks the config file: `explicit` (which must exist), then
/// [`DEFAULT_CONFIG_FILE`] in `local_dir`, then in `global_dir`.
///
/// Returns `None` when no config file exists; flags and environment may still
/// supply every parameter.
pub fn resolve_config_path(
    explicit: Option<PathBuf>,
    local_dir: &Path,
    global_dir: Option<&Path>,
) -> anyhow::Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(anyhow::anyhow!(
                "config file {} does not exist",
                path.display()
            ));
        }
        return Ok(Some(path));
    }
    let found = std::iter::once(local_dir)
        .chain(global_dir)
        .map(|dir| dir.join(DEFAULT_CONFIG_FILE))
        .find(|path| path.is_file());
    Ok(found)
}
