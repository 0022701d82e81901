use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for mermaid-chart operations
#[derive(Debug, Error)]
pub enum McError {
    // IO errors
    /// Generic IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a file failed.
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // Frontmatter errors
    /// The frontmatter block is not valid YAML.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // Linking errors
    /// `link` was asked to link a diagram that already has an `id`.
    #[error("Diagram at {0} already has an `id` field")]
    AlreadyLinked(String),

    /// `pull`/`push` need an `id` and the diagram has none.
    #[error("Diagram at {0} has no id, have you run `link` yet?")]
    NotLinked(String),

    /// The remote document exists but has never had code pushed to it.
    #[error("Diagram at {0} has no code, please use `push` first")]
    NoRemoteCode(String),

    /// The `id` frontmatter value is not a `<baseURL>/d/<documentID>` token.
    #[error("Invalid document ID: {0}")]
    InvalidIdentifier(String),

    /// The `id` token belongs to a different Mermaid Chart instance.
    #[error("This client is configured to use {expected}, but your diagram is using {found}")]
    BaseUrlMismatch {
        /// The instance this client is configured against.
        expected: String,
        /// The instance embedded in the diagram's `id`.
        found: String,
    },

    // Remote errors
    /// No API token was available from the flag or the config file.
    #[error("This command requires you to be logged in. Log in with the `login` command.")]
    NotAuthenticated,

    /// The server rejected a request, or it never got there.
    #[error("Remote request failed{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Remote {
        /// HTTP status code, if the server answered at all
        status: Option<u16>,
        /// The response body, or the transport error.
        message: String,
    },

    // Prompt errors abort the sequential link chain
    /// An interactive prompt could not be read.
    #[error("Failed to read user input: {0}")]
    Prompt(String),

    // Config errors
    /// The config file is not valid TOML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The platform config directory could not be determined.
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Result type alias for mermaid-chart operations
pub type Result<T> = std::result::Result<T, McError>;
