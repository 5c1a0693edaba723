//! The signed-in identity and the operations that change it.
//!
//! State is either anonymous (`None`) or authenticated with an [`Identity`].
//! Transitions are broadcast over a `watch` channel so the list layer can
//! reload or clear its caches.

use std::sync::Mutex;

use tokio::sync::watch;

use showtrack_core::config::DemoConfig;
use showtrack_core::digest::{digest_password, meets_min_length, verify_password, MIN_PASSWORD_LEN};
use showtrack_core::error::ShowtrackError;
use showtrack_core::models::Identity;

use crate::db::DbHandle;
use crate::local_store::{LocalStore, AUTH_USER_KEY};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no account exists for that email")]
    UnknownIdentity,
    #[error("incorrect password")]
    InvalidCredentials,
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("password must be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error(transparent)]
    Store(#[from] ShowtrackError),
}

pub struct Session {
    db: DbHandle,
    local: LocalStore,
    state: watch::Sender<Option<Identity>>,
    error: Mutex<Option<String>>,
}

impl Session {
    /// A new anonymous session. Call [`Session::restore`] to pick up a saved identity.
    pub fn new(db: DbHandle, local: LocalStore) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            db,
            local,
            state,
            error: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<Identity> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Observe identity transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.state.subscribe()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.lock().ok().and_then(|e| e.clone())
    }

    pub fn clear_error(&self) {
        self.set_error(None);
    }

    /// Load the identity saved by a previous process, if any.
    ///
    /// The saved identity is checked against the store. One whose account no
    /// longer exists is forgotten; when the store can't be reached the saved
    /// copy is trusted.
    pub async fn restore(&self) -> Option<Identity> {
        let saved = self.local.get::<Identity>(AUTH_USER_KEY)?;
        let identity = match self.db.identity_by_id(saved.id.as_str()).await {
            Ok(Some(current)) => current,
            Ok(None) => {
                tracing::warn!(id = %saved.id, "Saved identity no longer exists");
                self.local.clear_session();
                return None;
            }
            Err(e) => {
                tracing::warn!(id = %saved.id, "Could not verify saved identity: {e}");
                saved
            }
        };
        tracing::info!(id = %identity.id, "Restored saved session");
        self.state.send_replace(Some(identity.clone()));
        Some(identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.clear_error();
        let result = self.try_login(email, password).await;
        self.finish(result)
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let record = self
            .db
            .identity_by_email(email.trim())
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        if !verify_password(password, &record.password_digest) {
            tracing::debug!(email, "Password digest mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        Ok(record.identity)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Identity, AuthError> {
        self.clear_error();
        let result = self.try_register(name, email, password, confirm).await;
        self.finish(result)
    }

    async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Identity, AuthError> {
        if password != confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if !meets_min_length(password) {
            return Err(AuthError::WeakPassword);
        }
        let email = email.trim();
        if self.db.identity_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        match self
            .db
            .insert_identity(name.trim(), email, digest_password(password))
            .await
        {
            Ok(identity) => {
                tracing::info!(id = %identity.id, "Registered new identity");
                Ok(identity)
            }
            // Lost a race with another registration for the same email.
            Err(e) if e.is_constraint_violation() => Err(AuthError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Forget the identity and everything saved for it on this device.
    pub fn logout(&self) {
        self.local.clear_session();
        self.clear_error();
        if self.state.send_replace(None).is_some() {
            tracing::info!("Logged out");
        }
    }

    /// Replace the password for `email`. Does not change the signed-in identity.
    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AuthError> {
        self.clear_error();
        let result: Result<(), AuthError> = async {
            if !meets_min_length(new_password) {
                return Err(AuthError::WeakPassword);
            }
            let updated = self
                .db
                .update_password_digest(email.trim(), digest_password(new_password))
                .await?;
            if updated {
                tracing::info!(email, "Password reset");
                Ok(())
            } else {
                Err(AuthError::UnknownIdentity)
            }
        }
        .await;

        if let Err(e) = &result {
            self.set_error(Some(e.to_string()));
        }
        result
    }

    /// Make sure the configured demo account exists with the configured password.
    pub async fn ensure_demo_identity(&self, demo: &DemoConfig) -> Result<Identity, AuthError> {
        let digest = digest_password(&demo.password);
        match self.db.identity_by_email(demo.email.as_str()).await? {
            Some(record) => {
                if record.password_digest != digest {
                    self.db
                        .update_password_digest(demo.email.as_str(), digest)
                        .await?;
                    tracing::info!(email = %demo.email, "Refreshed demo identity");
                }
                Ok(record.identity)
            }
            None => {
                let identity = self
                    .db
                    .insert_identity(demo.name.as_str(), demo.email.as_str(), digest)
                    .await?;
                tracing::info!(email = %demo.email, "Created demo identity");
                Ok(identity)
            }
        }
    }

    fn finish(&self, result: Result<Identity, AuthError>) -> Result<Identity, AuthError> {
        match &result {
            Ok(identity) => {
                if let Err(e) = self.local.set(AUTH_USER_KEY, identity) {
                    tracing::warn!("Failed to save session: {e}");
                }
                self.state.send_replace(Some(identity.clone()));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Authentication failed");
                self.set_error(Some(e.to_string()));
            }
        }
        result
    }

    fn set_error(&self, message: Option<String>) {
        if let Ok(mut error) = self.error.lock() {
            *error = message;
        }
    }
}
