//! The caller behind one HTTP request.

use super::error::ApiError;

/// Populated by the JWT middleware for every request.
///
/// Anonymous callers can read; writes go through [`Actor::require_admin`]
/// when write protection is enabled.
#[derive(Clone, Debug, Default)]
pub struct Actor {
    /// Token subject, if a valid token was presented.
    pub subject: Option<String>,
    pub is_admin: bool,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(subject: impl Into<String>, is_admin: bool) -> Self {
        Self {
            subject: Some(subject.into()),
            is_admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject.is_some()
    }

    /// Returns false for anonymous callers regardless of the flag.
    pub fn is_admin(&self) -> bool {
        self.subject.is_some() && self.is_admin
    }

    pub fn require_admin(&self) -> Result<&str, ApiError> {
        match self.subject.as_deref() {
            Some(subject) if self.is_admin => Ok(subject),
            _ => Err(ApiError::Unauthorized),
        }
    }
}
