//! Session lifecycle: authentication state machine and token persistence.
//!
//! The session manager owns the `Anonymous → Authenticating → Authenticated`
//! state machine and the single persisted client-side value: the session
//! token. Expiry is never detected proactively; the first authenticated
//! call that comes back as an authentication failure forces the session
//! back to `Anonymous` (the workbench performs the dependent-state reset).

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::payloads::Credentials;
use crate::api::{ApiClient, ApiError};

/// Authentication state of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthPhase {
    /// No session; nothing may be fetched.
    #[default]
    Anonymous,
    /// A login round trip is in flight.
    Authenticating,
    /// A token is installed; treated as valid until a call proves otherwise.
    Authenticated,
}

/// Persistence seam for the session token.
///
/// Exactly one token value is ever stored. Implementations are best-effort:
/// a failing backing store must not break login or logout, so `save` and
/// `clear` report problems via logging rather than by failing the session
/// operation.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the previously persisted token, if any.
    async fn load(&self) -> Option<String>;
    /// Persists the token.
    async fn save(&self, token: &str);
    /// Removes any persisted token.
    async fn clear(&self);
}

/// Token store backed by a single file on disk.
#[derive(Clone, Debug)]
pub struct FsTokenStore {
    path: PathBuf,
}

impl FsTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FsTokenStore {
    async fn load(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let token = raw.trim().to_string();
                (!token.is_empty()).then_some(token)
            }
            Err(_) => None,
        }
    }

    async fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = tokio::fs::create_dir_all(parent).await {
                warn!(path = %self.path.display(), %err, "could not create token directory");
                return;
            }
        }
        if let Err(err) = tokio::fs::write(&self.path, token).await {
            warn!(path = %self.path.display(), %err, "could not persist session token");
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), %err, "could not remove session token"),
        }
    }
}

/// In-memory token store for tests and tokenless configurations.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cell: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<String> {
        self.cell.lock().clone()
    }

    async fn save(&self, token: &str) {
        *self.cell.lock() = Some(token.to_string());
    }

    async fn clear(&self) {
        *self.cell.lock() = None;
    }
}

/// Owns the session state machine and drives the auth endpoints.
///
/// # Examples
///
/// ```no_run
/// use flowdeck::api::ApiClient;
/// use flowdeck::session::{MemoryTokenStore, SessionManager};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), flowdeck::api::ApiError> {
/// let api = ApiClient::new("http://localhost:8000");
/// let mut session = SessionManager::new(api, Arc::new(MemoryTokenStore::new()));
/// let email = session.login("ada@example.com", "hunter2").await?;
/// assert_eq!(email, "ada@example.com");
/// # Ok(())
/// # }
/// ```
pub struct SessionManager {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    phase: AuthPhase,
    email: Option<String>,
}

impl SessionManager {
    #[must_use]
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            phase: AuthPhase::Anonymous,
            email: None,
        }
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// The profile email, once known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns `true` when the session is (assumed) valid.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    /// Logs in, installs the token, and returns the profile email.
    ///
    /// On any failure the session remains `Anonymous` and no token is
    /// kept: a login that obtained a token but could not fetch the
    /// profile is treated as failed.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<String, ApiError> {
        self.phase = AuthPhase::Authenticating;
        let credentials = Credentials::new(email, password);

        let grant = match self.api.login(&credentials).await {
            Ok(grant) => grant,
            Err(err) => {
                self.phase = AuthPhase::Anonymous;
                return Err(err);
            }
        };

        self.api.set_token(Some(grant.access_token.clone()));
        self.store.save(&grant.access_token).await;

        match self.api.get_me().await {
            Ok(profile) => {
                debug!(email = %profile.email, "session established");
                self.phase = AuthPhase::Authenticated;
                self.email = Some(profile.email.clone());
                Ok(profile.email)
            }
            Err(err) => {
                self.logout().await;
                Err(err)
            }
        }
    }

    /// Registers an account, then logs in with the same credentials.
    ///
    /// Registration alone does not establish a session.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<String, ApiError> {
        let credentials = Credentials::new(email, password);
        self.api.register(&credentials).await?;
        self.login(email, password).await
    }

    /// Fetches the profile for an already-installed token (restored
    /// sessions learn their email this way) and confirms the phase.
    pub async fn refresh_profile(&mut self) -> Result<String, ApiError> {
        let profile = self.api.get_me().await?;
        self.phase = AuthPhase::Authenticated;
        self.email = Some(profile.email.clone());
        Ok(profile.email)
    }

    /// Clears the token everywhere and returns to `Anonymous`.
    ///
    /// Unconditionally succeeds; dependent state owned by other
    /// components is the workbench's responsibility.
    pub async fn logout(&mut self) {
        self.api.set_token(None);
        self.store.clear().await;
        self.phase = AuthPhase::Anonymous;
        self.email = None;
    }

    /// Restores a persisted token at startup.
    ///
    /// A restored session is authenticated-until-proven-otherwise; the
    /// first authenticated call rejected with an auth failure forces a
    /// full logout. Returns `true` when a token was found.
    pub async fn restore(&mut self) -> bool {
        match self.store.load().await {
            Some(token) => {
                self.api.set_token(Some(token));
                self.phase = AuthPhase::Authenticated;
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("phase", &self.phase)
            .field("email", &self.email)
            .finish()
    }
}
