use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixeltapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Screen capture error: {0}")]
    Capture(String),

    #[error("Template load error: {0}")]
    TemplateLoad(String),

    #[error("Input injection error: {0}")]
    InputInjection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type PixeltapResult<T> = Result<T, PixeltapError>;
