//! Session identity reported by the auth endpoints.

use serde::{Deserialize, Serialize};

/// Role given to field volunteers; the only non-admin role in use.
pub const KADER_ROLE: &str = "kader";
pub const ADMIN_ROLE: &str = "admin";

/// User attached to the current session cookie.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Body of `POST /api/login`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response of `GET /api/check-auth` and `POST /api/login`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}
