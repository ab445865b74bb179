//! Paths of the booking store's REST endpoints, relative to the API base URL.

use std::fmt;

use chrono::NaiveDate;

/// A path under the API base URL, kept as unescaped segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn login() -> Self {
        Self::new(["auth", "login"])
    }

    pub fn register() -> Self {
        Self::new(["auth", "register"])
    }

    pub fn me() -> Self {
        Self::new(["auth", "me"])
    }

    pub fn meetings() -> Self {
        Self::new(["meetings"])
    }

    pub fn meeting(id: &str) -> Self {
        Self::new(["meetings", id])
    }

    pub fn rooms() -> Self {
        Self::new(["rooms"])
    }

    pub fn room(id: &str) -> Self {
        Self::new(["rooms", id])
    }

    /// Meetings of one room on one day; the day is written as `YYYY-MM-DD`.
    pub fn room_meetings(room_id: &str, day: NaiveDate) -> Self {
        Self::new([
            "rooms".to_string(),
            room_id.to_string(),
            "meetings".to_string(),
            day.format("%Y-%m-%d").to_string(),
        ])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
