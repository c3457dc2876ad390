use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaneError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No session found. Set PLANE_SESSION env var or add cookie to ~/.config/plane/config.toml"
    )]
    MissingSession,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Not a cycle page path: {0}")]
    InvalidPagePath(String),

    #[error("Not signed in. Sign in at {location}")]
    SignInRequired { location: String },

    #[error("Issue not found on this page: {0}")]
    IssueNotFound(String),

    #[error("Issues are required")]
    NoIssuesSelected,

    #[error("Issue editor is not open")]
    IssueModalClosed,

    #[error("Issue editor is open for {found}, not {expected}")]
    ModalMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Created issue {issue} but could not add it to the cycle: {source}")]
    AttachFailed {
        issue: String,
        #[source]
        source: Box<PlaneError>,
    },

    #[error("Read-only access: {0} requires member or owner role")]
    ReadOnly(&'static str),
}

pub type Result<T> = std::result::Result<T, PlaneError>;
