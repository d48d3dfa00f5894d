use thiserror::Error;

/// Error types for Spotify OAuth authorization-code capture
#[derive(Error, Debug)]
pub enum SpotifyAuthError {
    /// The listening socket could not be created. Fatal: nothing has been
    /// served yet and the caller cannot proceed without the port.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("callback server error: {0}")]
    CallbackServer(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[cfg(feature = "browser")]
    #[error("failed to open browser: {0}")]
    BrowserLaunch(String),
}

/// Result type alias for Spotify authentication operations
pub type Result<T> = std::result::Result<T, SpotifyAuthError>;
