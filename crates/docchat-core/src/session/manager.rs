//! Session lifecycle management.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{AuthApi, CredentialStore};
use crate::error::{DocchatError, Result};
use crate::session::model::{SessionPhase, SessionState};
use crate::user::User;

/// Owns authentication state and its lifecycle across process restarts.
///
/// `SessionManager` is responsible for:
/// - Exchanging credentials for a token and resolving the user profile
/// - Restoring a persisted session on startup
/// - Clearing state and persisted credentials on logout
/// - Forced invalidation when any API call observes a 401
///
/// Concurrent login attempts are not guarded against reentrancy; the last
/// state write wins. The UI serializes attempts by disabling the form
/// while one is in flight.
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    credentials: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Creates a manager in the anonymous state.
    pub fn new(auth: Arc<dyn AuthApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            auth,
            credentials,
            state: RwLock::new(SessionState::anonymous()),
        }
    }

    /// Returns a snapshot of the current session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// True when a user profile is resolved and the session is valid.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated()
    }

    /// Attempts to sign in with the given credentials.
    ///
    /// Two round trips must both succeed: the credential exchange and the
    /// profile fetch. If the profile fetch fails after a token was issued,
    /// the session is marked failed anyway; a token without a resolvable
    /// profile is not a valid session. The issued token stays persisted so
    /// a later [`restore`](Self::restore) can retry profile resolution.
    ///
    /// # Errors
    ///
    /// Returns `Validation` without touching session state when either
    /// input is empty; otherwise propagates the failing step's error after
    /// recording it in the session state.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DocchatError::validation("Email and password are required."));
        }

        {
            let mut state = self.state.write().await;
            state.phase = SessionPhase::Authenticating;
            state.error = None;
        }

        let token = match self.auth.login(email, password).await {
            Ok(token) => token,
            Err(err) => return Err(self.fail_login(err).await),
        };
        if let Err(err) = self.credentials.save_token(&token.access_token) {
            return Err(self.fail_login(err).await);
        }

        let user = match self.auth.current_user().await {
            Ok(user) => user,
            Err(err) => return Err(self.fail_login(err).await),
        };
        // The profile cache is best-effort; the authoritative copy lives
        // in session state.
        let _ = self.credentials.save_profile(&user);

        let mut state = self.state.write().await;
        state.phase = SessionPhase::Authenticated;
        state.user = Some(user.clone());
        state.error = None;
        Ok(user)
    }

    /// Signs out: clears persisted credentials and resets to anonymous.
    ///
    /// Never fails and performs no server round trip. Storage errors while
    /// clearing are swallowed; the in-memory state is reset regardless.
    pub async fn logout(&self) {
        let _ = self.credentials.clear();
        *self.state.write().await = SessionState::anonymous();
    }

    /// Forced invalidation, used when any API call observes a 401.
    pub async fn force_logout(&self) {
        self.logout().await;
    }

    /// Restores a persisted session on startup.
    ///
    /// If a token is persisted, a locally cached profile is used when
    /// present; otherwise the token is validated with a profile round
    /// trip. A failed round trip forces a logout.
    ///
    /// Returns `true` when a session was restored.
    pub async fn restore(&self) -> Result<bool> {
        let Some(_token) = self.credentials.load_token()? else {
            return Ok(false);
        };

        if let Ok(Some(user)) = self.credentials.load_profile() {
            let mut state = self.state.write().await;
            state.phase = SessionPhase::Authenticated;
            state.user = Some(user);
            state.error = None;
            return Ok(true);
        }

        match self.auth.current_user().await {
            Ok(user) => {
                let _ = self.credentials.save_profile(&user);
                let mut state = self.state.write().await;
                state.phase = SessionPhase::Authenticated;
                state.user = Some(user);
                state.error = None;
                Ok(true)
            }
            Err(_) => {
                self.logout().await;
                Ok(false)
            }
        }
    }

    /// Clears the recorded login error.
    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }

    async fn fail_login(&self, err: DocchatError) -> DocchatError {
        // The login form shows the server's own message when it sent one
        // ("Incorrect email or password"); the generic 401 mapping is for
        // calls made inside an established session.
        let message = match &err {
            DocchatError::Http { message, .. } if !message.is_empty() => message.clone(),
            _ => err.user_message(),
        };
        let mut state = self.state.write().await;
        state.phase = SessionPhase::Anonymous;
        state.user = None;
        state.error = Some(message);
        err
    }
}
