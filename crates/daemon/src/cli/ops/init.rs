use clap::Args;

use shelf_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the API server
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Base URL clients reach the server at
    #[arg(long)]
    pub public_url: Option<String>,

    /// Allowed CORS origin (any origin if not set)
    #[arg(long)]
    pub cors_origin: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.api_port {
            config.api_port = port;
        }
        config.public_url = self.public_url.clone();
        config.cors_origin = self.cors_origin.clone();

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let mut lines = vec![format!(
            "Initialized shelf directory at {}",
            state.shelf_dir.display()
        )];
        lines.push(format!("  config:  {}", state.config_path.display()));
        lines.push(format!("  db:      {}", state.db_path.display()));
        lines.push(format!("  images:  {}", state.images_path.display()));
        lines.push(format!("  api:     {}", state.config.public_url()));
        Ok(lines.join("\n"))
    }
}
