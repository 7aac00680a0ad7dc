use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Config {
    // Listen address
    pub listen_addr: SocketAddr,
    // log level for http tracing
    pub log_level: tracing::Level,
    // Allowed CORS origin, any origin if not set
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn new(listen_addr: SocketAddr, cors_origin: Option<String>) -> Self {
        tracing::info!(
            "Creating HTTP server Config: listen_addr={}, cors_origin={:?}",
            listen_addr,
            cors_origin
        );
        Self {
            listen_addr,
            log_level: tracing::Level::INFO,
            cors_origin,
        }
    }
}
