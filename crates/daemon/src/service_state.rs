use url::Url;

use common::auth::TokenIssuer;
use common::catalog::Catalog;

use crate::database::{Database, DatabaseSetupError};
use crate::images::{ImageStore, ImageStoreError};
use crate::ServiceConfig;

/// Main service state, shared by every request handler
#[derive(Clone, Debug)]
pub struct State {
    catalog: Catalog<Database>,
    images: ImageStore,
    public_url: String,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup image store
        let images = ImageStore::new(&config.image_store, config.images_dir.clone()).await?;
        tracing::debug!(backend = ?config.image_store, "image store ready");

        Ok(Self::new(
            database,
            images,
            TokenIssuer::new(&config.token_secret),
            config.bcrypt_cost,
            config.public_url.clone(),
        ))
    }

    pub fn new(
        database: Database,
        images: ImageStore,
        tokens: TokenIssuer,
        bcrypt_cost: u32,
        public_url: String,
    ) -> Self {
        Self {
            catalog: Catalog::new(database, tokens).with_password_cost(bcrypt_cost),
            images,
            public_url,
        }
    }

    pub fn catalog(&self) -> &Catalog<Database> {
        &self.catalog
    }

    pub fn database(&self) -> &Database {
        self.catalog.store()
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Image store error: {0}")]
    ImageStore(#[from] ImageStoreError),
}
