use thiserror::Error;

#[derive(Debug, Error)]
pub enum CinefavError {
    #[error("config error: {0}")]
    Config(String),

    #[error("identity error: {0}")]
    Identity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
