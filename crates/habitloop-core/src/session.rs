//! The signed-in (or anonymous) user for the current session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account on the hosted backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Anonymous users keep their data local-only. Absent on the wire:
    /// an account returned by the backend is by definition not anonymous.
    #[serde(default)]
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Session state: who, if anyone, is signed in.
///
/// Remote replication happens only while a non-anonymous user with an
/// access token is present; everything else stays local.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Session {
    /// Start a signed-in session.
    pub fn signed_in(user: User, access_token: impl Into<String>) -> Self {
        Session {
            user: Some(user),
            access_token: Some(access_token.into()),
        }
    }

    /// Whether a non-anonymous user is present.
    pub fn is_signed_in(&self) -> bool {
        matches!(&self.user, Some(user) if !user.anonymous)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    /// Drop the user and token, returning to anonymous mode.
    pub fn clear(&mut self) {
        self.user = None;
        self.access_token = None;
    }
}
