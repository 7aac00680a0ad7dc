use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::images::ImageStoreConfig;

pub const APP_NAME: &str = "shelf";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const SECRET_FILE_NAME: &str = "jwt.secret";
pub const IMAGES_DIR_NAME: &str = "images";

/// Length in bytes of a generated token signing secret
const SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Allowed CORS origin (any origin if not set)
    #[serde(default)]
    pub cors_origin: Option<String>,
    /// Base URL clients reach the server at, used for image links
    ///  (defaults to http://localhost:<api_port>)
    #[serde(default)]
    pub public_url: Option<String>,
    /// bcrypt work factor for new passwords
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Where uploaded book covers are kept
    #[serde(default)]
    pub image_store: ImageStoreConfig,
}

fn default_api_port() -> u16 {
    5001
}

fn default_bcrypt_cost() -> u32 {
    common::auth::DEFAULT_COST
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            cors_origin: None,
            public_url: None,
            bcrypt_cost: default_bcrypt_cost(),
            image_store: ImageStoreConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn public_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.api_port))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the shelf directory (~/.shelf)
    pub shelf_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the token signing secret
    pub secret_path: PathBuf,
    /// Path to the local image directory
    pub images_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the shelf directory path (custom or default ~/.shelf)
    pub fn shelf_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new shelf state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if shelf_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&shelf_dir)?;

        let images_path = shelf_dir.join(IMAGES_DIR_NAME);
        fs::create_dir_all(&images_path)?;

        let secret: [u8; SECRET_LEN] = rand::random();
        let secret_path = shelf_dir.join(SECRET_FILE_NAME);
        fs::write(&secret_path, hex::encode(secret))?;

        let config = config.unwrap_or_default();
        let config_path = shelf_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // schema is applied by the service on first connect
        let db_path = shelf_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            shelf_dir,
            db_path,
            secret_path,
            images_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the shelf directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if !shelf_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = shelf_dir.join(DB_FILE_NAME);
        let secret_path = shelf_dir.join(SECRET_FILE_NAME);
        let images_path = shelf_dir.join(IMAGES_DIR_NAME);
        let config_path = shelf_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !secret_path.exists() {
            return Err(StateError::MissingFile(SECRET_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            shelf_dir,
            db_path,
            secret_path,
            images_path,
            config_path,
            config,
        })
    }

    /// Load the token signing secret
    pub fn load_secret(&self) -> Result<Vec<u8>, StateError> {
        let encoded = fs::read_to_string(&self.secret_path)?;
        let secret =
            hex::decode(encoded.trim()).map_err(|e| StateError::InvalidSecret(e.to_string()))?;
        if secret.len() < SECRET_LEN {
            return Err(StateError::InvalidSecret(format!(
                "expected at least {} bytes, found {}",
                SECRET_LEN,
                secret.len()
            )));
        }
        Ok(secret)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shelf directory not initialized. Run 'shelf init' first")]
    NotInitialized,

    #[error("shelf directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid token secret: {0}")]
    InvalidSecret(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
