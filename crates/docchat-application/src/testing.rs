//! Shared test fixtures for the service unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use docchat_core::api::{AuthApi, AuthToken, CredentialStore};
use docchat_core::document::FileUpload;
use docchat_core::session::SessionManager;
use docchat_core::user::User;
use docchat_core::Result;

pub(crate) struct StubAuthApi;

#[async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, email: &str, _password: &str) -> Result<AuthToken> {
        let _ = email;
        Ok(AuthToken {
            access_token: "tok-test".to_string(),
            expires_in: None,
        })
    }

    async fn current_user(&self) -> Result<User> {
        Ok(User {
            id: 1,
            email: "ada@example.com".to_string(),
            created_at: chrono::Utc::now(),
        })
    }
}

#[derive(Default)]
pub(crate) struct MemoryCredentialStore {
    inner: Mutex<HashMap<&'static str, String>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn save_token(&self, token: &str) -> Result<()> {
        self.inner.lock().unwrap().insert("token", token.to_string());
        Ok(())
    }

    fn load_token(&self) -> Result<Option<String>> {
        Ok(self.inner.lock().unwrap().get("token").cloned())
    }

    fn save_profile(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user).unwrap();
        self.inner.lock().unwrap().insert("profile", json);
        Ok(())
    }

    fn load_profile(&self) -> Result<Option<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .get("profile")
            .map(|json| serde_json::from_str(json).unwrap()))
    }

    fn clear(&self) -> Result<()> {
        self.inner.lock().unwrap().clear();
        Ok(())
    }
}

/// A session manager in the anonymous state.
pub(crate) fn no_auth_session() -> Arc<SessionManager> {
    Arc::new(SessionManager::new(
        Arc::new(StubAuthApi),
        Arc::new(MemoryCredentialStore::default()),
    ))
}

/// A session manager that has completed a successful login.
pub(crate) async fn authenticated_session() -> Arc<SessionManager> {
    let session = no_auth_session();
    session.login("ada@example.com", "secret").await.unwrap();
    session
}

/// A small, valid PDF upload fixture.
pub(crate) fn pdf_upload(name: &str) -> FileUpload {
    FileUpload {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        data: vec![0u8; 256],
    }
}
