//! Client configuration for the flowdeck engine.
//!
//! Resolution order mirrors the rest of the stack: explicit values win,
//! then environment variables (loaded through `dotenvy` so a local `.env`
//! works during development), then built-in defaults.

use std::path::PathBuf;

/// Configuration for a [`crate::workbench::Workbench`] instance.
///
/// # Examples
///
/// ```
/// use flowdeck::config::ClientConfig;
///
/// let config = ClientConfig::new("http://localhost:8000")
///     .with_token_path("/tmp/flowdeck-token");
/// assert_eq!(config.base_url(), "http://localhost:8000");
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    token_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Environment variable naming the backend base URL.
    pub const API_URL_VAR: &'static str = "FLOWDECK_API_URL";
    /// Environment variable naming the token storage file.
    pub const TOKEN_PATH_VAR: &'static str = "FLOWDECK_TOKEN_PATH";

    const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Creates a configuration pointing at the given backend base URL.
    ///
    /// Trailing slashes are stripped so endpoint paths can be joined
    /// uniformly.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_path: None,
        }
    }

    /// Resolves a configuration from the environment.
    ///
    /// Reads [`Self::API_URL_VAR`] and [`Self::TOKEN_PATH_VAR`], falling
    /// back to `http://localhost:8000` and no persistent token storage.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let base_url =
            std::env::var(Self::API_URL_VAR).unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        let token_path = std::env::var(Self::TOKEN_PATH_VAR).ok().map(PathBuf::from);
        let mut config = Self::new(base_url);
        config.token_path = token_path;
        config
    }

    /// Sets the file the session token is persisted to.
    ///
    /// Without a token path the token lives only in memory and does not
    /// survive the process.
    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token storage file, if persistent storage was configured.
    pub fn token_path(&self) -> Option<&PathBuf> {
        self.token_path.as_ref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
