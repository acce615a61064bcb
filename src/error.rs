//! Error types for the viewer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Window creation or presentation failed.
    #[error("Window error: {0}")]
    Window(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Writing a snapshot image failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The camera matrices cannot be inverted, so no picking ray exists.
    #[error("Degenerate camera: {0}")]
    Camera(String),
}

impl From<minifb::Error> for Error {
    fn from(err: minifb::Error) -> Self {
        Error::Window(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
