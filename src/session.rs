// Session state for the lifetime of the process. Credentials are only ever
// set by a successful login and are handed to each authenticated request
// explicitly.

use serde_json::Value;

/// Username/password pair sent as HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    user_id: Option<Value>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.username.as_str())
    }

    pub fn password(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.password.as_str())
    }

    /// Opaque id returned by the backend on login.
    pub fn user_id(&self) -> Option<&Value> {
        self.user_id.as_ref()
    }

    pub(crate) fn sign_in(&mut self, credentials: Credentials, user_id: Option<Value>) {
        self.credentials = Some(credentials);
        self.user_id = user_id;
    }
}
