//! The authenticated session.
//!
//! A [`Session`] exists only after the store accepted a login, a registration
//! or a stored token (see [`crate::ApiClient::resume`]). It is passed by
//! reference to every authenticated call and ends when it is dropped, when
//! [`Session::end`] is called, or when a request fails with
//! [`crate::ApiError::Unauthorized`].

use std::fmt;

use booking_engine::User;
use tracing::info;

#[derive(Clone)]
pub struct Session {
    token: String,
    user: User,
}

impl Session {
    pub(crate) fn new(token: String, user: User) -> Self {
        info!(user_id = %user.id, "session started");
        Self { token, user }
    }

    /// The signed-in user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The bearer credential, e.g. to persist it for a later [`crate::ApiClient::resume`].
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Log out. The store keeps no server-side session, so this only discards
    /// the credential.
    pub fn end(self) {
        info!(user_id = %self.user.id, "session ended");
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
