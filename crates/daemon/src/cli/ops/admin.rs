use clap::Args;
use url::Url;

use common::auth::TokenIssuer;
use common::catalog::Catalog;
use common::error::CatalogError;
use shelf_daemon::database::DatabaseSetupError;
use shelf_daemon::state::{AppState, StateError};
use shelf_daemon::Database;

/// Grant the administrator role to a registered account.
///
/// Works directly against the local database, so the daemon does not
///  need to be running.
#[derive(Args, Debug, Clone)]
pub struct Admin {
    /// Email the account was registered with
    #[arg(long)]
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("invalid database path: {0}")]
    DatabasePath(#[from] url::ParseError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseSetupError),
    #[error("{0}")]
    Catalog(#[from] CatalogError<sqlx::Error>),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Admin {
    type Error = AdminError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let secret = state.load_secret()?;

        let url = Url::parse(&format!("sqlite://{}", state.db_path.display()))?;
        let database = Database::connect(&url).await?;
        let catalog = Catalog::new(database, TokenIssuer::new(&secret));

        let user = catalog.grant_admin(&self.email).await?;
        Ok(format!(
            "{} ({}) is now an administrator",
            user.username, user.email
        ))
    }
}
