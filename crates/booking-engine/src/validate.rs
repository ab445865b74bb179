//! Pre-submission checks for a new booking.
//!
//! The checks run against the caller's local copy of the user's meetings, so
//! they can only catch what that snapshot shows. Two sessions of the same user,
//! or a stale snapshot, can both pass; the booking store re-validates every
//! create request and its answer is the one that counts.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

use crate::error::Result;
use crate::model::{Meeting, NewMeeting};
use crate::slots::{is_slot_hour, slot_hour, slot_window};

/// Why a proposed booking was not submitted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectionReason {
    /// No date or no time slot was chosen.
    #[error("select a date and a time slot")]
    MissingSelection,

    /// The window is not exactly one of the fixed hourly slots. Slot selection
    /// never produces this; it means the caller built the window by hand.
    #[error("a booking must cover exactly one hourly slot between 08:00 and 18:00")]
    InvalidWindow,

    /// The user already holds a meeting that has not started yet.
    #[error("you already have an open booking; cancel it before creating a new one")]
    ActiveBookingExists,

    /// The selected slot starts before the evaluation time.
    #[error("the selected slot is in the past")]
    StartInPast,
}

/// A well-formed one-slot booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingProposal {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingProposal {
    /// Build the window for `slot` (e.g. `"14:00"`) on `day`, wall-clock in `tz`.
    ///
    /// The end is always derived as start + 1 hour.
    pub fn from_selection(day: NaiveDate, slot: &str, tz: Tz) -> Result<Self> {
        let (start, end) = slot_window(day, slot_hour(slot)?, tz)?;
        Ok(Self { start, end })
    }

    /// Turn the accepted window into a create payload.
    pub fn into_new_meeting(
        self,
        title: impl Into<String>,
        room_id: impl Into<String>,
        description: Option<String>,
    ) -> NewMeeting {
        NewMeeting {
            title: title.into(),
            description,
            start_time: self.start,
            end_time: self.end,
            room_id: room_id.into(),
        }
    }
}

/// A meeting is active while its start is strictly after `now`.
pub fn is_active(meeting: &Meeting, now: DateTime<Utc>) -> bool {
    meeting.start_time > now
}

/// Whether any of `meetings` is still active at `now`.
pub fn has_active_booking(meetings: &[Meeting], now: DateTime<Utc>) -> bool {
    meetings.iter().any(|m| is_active(m, now))
}

/// Validate a proposed booking with slot hours evaluated in UTC.
///
/// Equivalent to [`validate_new_booking_in`] with `Tz::UTC`.
pub fn validate_new_booking(
    existing_user_meetings: &[Meeting],
    proposed_start: Option<DateTime<Utc>>,
    proposed_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> std::result::Result<BookingProposal, RejectionReason> {
    validate_new_booking_in(existing_user_meetings, proposed_start, proposed_end, now, Tz::UTC)
}

/// Validate a proposed booking against the single-active-booking rule and the
/// fixed slot grid.
///
/// Checks run in a fixed order and the first failure wins:
///
/// 1. both bounds present, else [`RejectionReason::MissingSelection`];
/// 2. no meeting in `existing_user_meetings` starts after `now`, else
///    [`RejectionReason::ActiveBookingExists`];
/// 3. the window is one slot (start on a slot hour in `tz`, end = start + 1h),
///    else [`RejectionReason::InvalidWindow`];
/// 4. the window does not start before `now`, else
///    [`RejectionReason::StartInPast`].
///
/// No room-conflict check happens here; that is the store's call.
pub fn validate_new_booking_in(
    existing_user_meetings: &[Meeting],
    proposed_start: Option<DateTime<Utc>>,
    proposed_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: Tz,
) -> std::result::Result<BookingProposal, RejectionReason> {
    let (Some(start), Some(end)) = (proposed_start, proposed_end) else {
        return Err(RejectionReason::MissingSelection);
    };

    if has_active_booking(existing_user_meetings, now) {
        return Err(RejectionReason::ActiveBookingExists);
    }

    if !is_slot_window(start, end, tz) {
        return Err(RejectionReason::InvalidWindow);
    }

    if start < now {
        return Err(RejectionReason::StartInPast);
    }

    Ok(BookingProposal { start, end })
}

fn is_slot_window(start: DateTime<Utc>, end: DateTime<Utc>, tz: Tz) -> bool {
    let local = start.with_timezone(&tz);
    end - start == Duration::hours(1)
        && is_slot_hour(local.hour())
        && local.minute() == 0
        && local.second() == 0
        && local.nanosecond() == 0
}
