use sea_orm::DbErr;
use std::fmt;

use crate::config::ConfigError;

#[derive(Debug)]
pub enum DaoLayerError {
    Db(DbErr),
    NotFound { entity: &'static str, id: i32 },
    Config(ConfigError),
}

pub type DaoResult<T> = Result<T, DaoLayerError>;

impl fmt::Display for DaoLayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoLayerError::Db(err) => write!(f, "Database error: {err}"),
            DaoLayerError::NotFound { entity, id } => {
                write!(f, "{entity} not found (id={id})")
            }
            DaoLayerError::Config(err) => write!(f, "Configuration error: {err}"),
        }
    }
}

impl std::error::Error for DaoLayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DaoLayerError::Db(err) => Some(err),
            DaoLayerError::Config(err) => Some(err),
            DaoLayerError::NotFound { .. } => None,
        }
    }
}

impl From<ConfigError> for DaoLayerError {
    fn from(err: ConfigError) -> Self {
        DaoLayerError::Config(err)
    }
}
