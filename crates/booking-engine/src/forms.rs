//! Field checks applied before a form is sent to the store.

use thiserror::Error;

use crate::model::{NewMeeting, NewRoom};

/// Minimum password length, counted in UTF-16 code units as browsers count it.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("capacity must be at least 1")]
    InvalidCapacity,
}

/// A filled-in sign-up form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Mismatched passwords are reported before a short password.
    pub fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

impl NewRoom {
    pub fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        if self.capacity < 1 {
            return Err(FormError::InvalidCapacity);
        }
        Ok(())
    }
}

impl NewMeeting {
    pub fn validate(&self) -> Result<(), FormError> {
        require("title", &self.title)?;
        require("room", &self.room_id)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(())
    }
}
