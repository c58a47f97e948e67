use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read settings from {path}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("terminal i/o failed")]
    Terminal(#[from] std::io::Error),

    #[error("session is no longer accepting commands")]
    SessionClosed,

    #[error("session task failed")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
