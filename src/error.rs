use thiserror::Error as TError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, TError)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] figment::Error),
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("TokenNotFound: {0}")]
    TokenNotFound(String),
    #[error("MissingAudience: a projected token requires an audience")]
    MissingAudience,
    #[error("MissingUriVariable: {0}")]
    MissingUriVariable(String),
    #[error("MissingMetadata: {0}")]
    MissingMetadata(&'static str),
    #[error("UnsupportedFormat: {0}")]
    UnsupportedFormat(String),
}
