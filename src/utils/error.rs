use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("USPS request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("XML processing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings file error: {0}")]
    SettingsFileError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Malformed response document: {message}")]
    MalformedResponse { message: String },
}

pub type Result<T> = std::result::Result<T, ShippingError>;
