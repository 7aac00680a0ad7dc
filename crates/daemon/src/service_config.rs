use std::path::PathBuf;

use crate::images::ImageStoreConfig;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// Allowed CORS origin, any origin if not set
    pub cors_origin: Option<String>,
    /// Base URL clients reach the server at
    pub public_url: String,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // image configuration
    pub image_store: ImageStoreConfig,
    /// Directory used by a local image store without an explicit path
    pub images_dir: PathBuf,

    // credentials
    /// HMAC secret for signing session tokens
    pub token_secret: Vec<u8>,
    /// bcrypt work factor for new passwords
    pub bcrypt_cost: u32,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
