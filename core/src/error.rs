use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unauthenticated: no resolvable caller identity")]
    Unauthenticated,

    #[error("Forbidden: role '{role}' is not an authorized admin role")]
    Forbidden { role: String },

    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Unknown role '{name}'")]
    UnknownRole { name: String },

    #[error("Invalid stored value in {column}: {value}")]
    InvalidStoredValue { column: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AlertError {
    /// HTTP-style status code surfaced by the transport adapters.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. } => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden { .. } => 403,
            _ => 500,
        }
    }
}

pub type AlertResult<T> = Result<T, AlertError>;
