use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error(transparent)]
    Note(#[from] crate::domain::NoteError),

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),

    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error("escaped literal was rejected by the pattern engine: {0}")]
    PatternEscapeDefect(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ScratchResult<T> = Result<T, ScratchError>;
