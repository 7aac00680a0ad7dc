use crate::auth::TokenError;
use crate::policy::{AccessError, PolicyError};
use crate::store::StoreError;

/// Coarse classification of a failed operation. Transports map each
///  kind to exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or range, duplicates, wrong credentials
    Invalid,
    /// No valid credential was presented
    Unauthenticated,
    /// Authenticated, but not the owner or not an administrator
    Forbidden,
    NotFound,
    /// Store or infrastructure failure, details stay server side
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError<E> {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("{0}")]
    Invalid(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("store error: {0}")]
    Store(E),
    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
    #[error("token error: {0}")]
    Token(#[from] TokenError),
}

impl<E> CatalogError<E> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Policy(PolicyError::Invalid(_))
            | CatalogError::Policy(PolicyError::Duplicate(_))
            | CatalogError::Invalid(_)
            | CatalogError::InvalidCredentials => ErrorKind::Invalid,
            CatalogError::Policy(PolicyError::Forbidden(_))
            | CatalogError::Access(AccessError::Forbidden) => ErrorKind::Forbidden,
            CatalogError::Policy(PolicyError::NotFound(_)) => ErrorKind::NotFound,
            CatalogError::Access(AccessError::Unauthenticated(_)) => ErrorKind::Unauthenticated,
            CatalogError::Store(_) | CatalogError::Password(_) | CatalogError::Token(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl<E> From<StoreError<E>> for CatalogError<E> {
    fn from(err: StoreError<E>) -> Self {
        match err {
            StoreError::Provider(e) => CatalogError::Store(e),
            StoreError::Conflict(msg) => CatalogError::Invalid(msg),
        }
    }
}
