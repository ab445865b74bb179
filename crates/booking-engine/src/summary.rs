//! Dashboard figures derived from the local meeting and room snapshots.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::model::{Meeting, Room};
use crate::snapshot::Snapshot;

/// How many upcoming meetings the dashboard lists.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Meetings starting today (in the summary timezone), by start time.
    pub today: Vec<Meeting>,
    /// The next [`UPCOMING_LIMIT`] meetings that have not started.
    pub upcoming: Vec<Meeting>,
    pub total_meetings: usize,
    pub total_rooms: usize,
}

/// Summarize the snapshots as of `now`, with "today" evaluated in `tz`.
pub fn summarize(
    meetings: &Snapshot<Meeting>,
    rooms: &Snapshot<Room>,
    now: DateTime<Utc>,
    tz: Tz,
) -> DashboardSummary {
    let today = now.with_timezone(&tz).date_naive();
    DashboardSummary {
        today: meetings.on_day(today, tz).into_iter().cloned().collect(),
        upcoming: meetings
            .upcoming(now, UPCOMING_LIMIT)
            .into_iter()
            .cloned()
            .collect(),
        total_meetings: meetings.len(),
        total_rooms: rooms.len(),
    }
}
