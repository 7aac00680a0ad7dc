use clap::Args;

use shelf_daemon::state::AppState;
use shelf_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] shelf_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let token_secret = state.load_secret()?;

        let api_port = self.api_port.unwrap_or(state.config.api_port);
        let public_url = match self.api_port {
            // a port override moves the default public URL with it
            Some(port) if state.config.public_url.is_none() => {
                format!("http://localhost:{}", port)
            }
            _ => state.config.public_url(),
        };

        let config = ServiceConfig {
            api_port,
            cors_origin: state.config.cors_origin.clone(),
            public_url,
            sqlite_path: Some(state.db_path.clone()),
            image_store: state.config.image_store.clone(),
            images_dir: state.images_path.clone(),
            token_secret,
            bcrypt_cost: state.config.bcrypt_cost,
            log_level: tracing::Level::DEBUG,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
