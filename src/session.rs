//! Authentication context shared by the views.
//!
//! A session is created once (from whatever the host stores the shared
//! secret in) and handed to each view that needs it, so "is the user
//! allowed to edit" has exactly one answer.

/// Who is using the application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// A visitor without a token.
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// A session holding `token`; blank tokens give an anonymous session.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut session = Self::anonymous();
        session.authenticate(&token.into());
        session
    }

    /// Accept a shared-secret token. Returns whether the session is now
    /// authenticated.
    pub fn authenticate(&mut self, token: &str) -> bool {
        let token = token.trim();
        if token.is_empty() {
            tracing::debug!("rejected blank token");
            return false;
        }
        self.token = Some(token.to_string());
        true
    }

    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn sign_out(&mut self) {
        self.token = None;
    }
}
