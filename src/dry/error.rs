use thiserror::Error;

#[derive(Error, Debug)]
pub enum DryError {
    #[error("{0}")]
    Usage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Malformed config: {0}")]
    ConfigParse(#[from] ini::ParseError),

    #[error("Mount error: {0}")]
    Mount(String),

    #[error("The '{0}' command is not implemented")]
    Unimplemented(&'static str),

    #[error("Failed to run '{program}': {message}")]
    Tool { program: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DryError>;
