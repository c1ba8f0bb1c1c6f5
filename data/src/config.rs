use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::environment;

/// Written next to the settings file when none exists, so first launch
/// leaves something behind for the user to edit.
const SETTINGS_TEMPLATE: &str =
    include_str!("../../assets/default-settings.json");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub servers: Vec<Server>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    pub url: String,
    pub nick: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    pub user_name: Option<String>,
    pub real_name: Option<String>,
    pub password: Option<String>,
    pub nick_password: Option<String>,
    #[serde(default = "default_auto_connect")]
    pub auto_connect: bool,
    #[serde(default)]
    pub channels: Vec<String>,
    /// Keys for keyed autojoin channels, by channel name.
    #[serde(default)]
    pub channel_keys: HashMap<String, String>,
}

impl Server {
    pub fn user_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.nick)
    }

    pub fn real_name(&self) -> &str {
        self.real_name.as_deref().unwrap_or(&self.nick)
    }
}

fn default_port() -> u16 {
    6667
}

fn default_auto_connect() -> bool {
    true
}

impl Config {
    pub fn config_dir() -> PathBuf {
        let dir = environment::config_dir();

        if !dir.exists() {
            fs::create_dir_all(dir.as_path())
                .expect("expected permissions to create config folder");
        }

        dir
    }

    fn path() -> PathBuf {
        Self::config_dir().join(environment::SETTINGS_FILE_NAME)
    }

    pub fn load() -> Result<Self, Error> {
        let content = fs::read_to_string(Self::path())
            .map_err(|e| Error::Read(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Settings problems never abort startup: a missing file is replaced
    /// with the bundled template, a broken one is left alone for the user
    /// to repair while the template settings are used for this run.
    pub fn load_or_default() -> Self {
        let path = Self::path();

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("settings could not be parsed: {e}");
                    Self::template()
                }
            },
            Err(e) => {
                log::warn!("settings could not be read: {e}");

                if let Err(e) = fs::write(&path, SETTINGS_TEMPLATE) {
                    log::warn!("could not write default settings: {e}");
                }

                Self::template()
            }
        }
    }

    fn template() -> Self {
        serde_json::from_str(SETTINGS_TEMPLATE)
            .expect("parse bundled settings")
    }
}

#[derive(Debug, Error, Clone)]
pub enum Error {
    #[error("settings could not be read: {0}")]
    Read(String),
    #[error("{0}")]
    Parse(String),
}
