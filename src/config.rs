use std::{env, fs, path::{Path, PathBuf}};

use log::debug;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const CONFIG_ENV: &str = "YGODATA_CONFIG";
pub const CONFIG_FILE: &str = "ygodata.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Catalog to open when none is given on the command line.
    pub catalog: Option<PathBuf>,
    /// How many cards "list all" prints.
    pub list_limit: usize,
    /// How many times a file name is asked for before giving up.
    pub max_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: None,
            list_limit: 50,
            max_attempts: 5,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text)
            .map_err(|e| Error::Config(e.to_string()))?;
        if config.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .map_err(|source| Error::SourceUnavailable { path: path.to_path_buf(), source })?;
        Config::from_toml(&text)
            .map_err(|e| match e {
                Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
                other => other,
            })
    }
}

/// An explicit path wins, then `$YGODATA_CONFIG`, then `./ygodata.toml`.
/// Without any of them the defaults are used.
pub fn get_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.is_file() {
                    debug!("no config file, using defaults");
                    return Ok(Config::default());
                }
                local
            },
        },
    };
    debug!("reading config from {}", path.display());
    Config::from_file(&path)
}

#[test]
fn empty_is_default() {
    assert_eq!(Config::from_toml("").unwrap(), Config::default());
}

#[test]
fn overrides() {
    let config = Config::from_toml("catalog = \"cards.csv\"\nlist_limit = 10\n").unwrap();

    assert_eq!(config.catalog, Some(PathBuf::from("cards.csv")));
    assert_eq!(config.list_limit, 10);
    assert_eq!(config.max_attempts, 5);
}

#[test]
fn unknown_key_rejected() {
    assert!(matches!(Config::from_toml("colour = true"), Err(Error::Config(_))));
}

#[test]
fn zero_attempts_rejected() {
    assert!(matches!(Config::from_toml("max_attempts = 0"), Err(Error::Config(_))));
}
