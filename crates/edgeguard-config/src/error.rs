use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON after comment and trailing-comma cleanup: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config root must be an object, found {found}")]
    RootNotObject { found: &'static str },
}
