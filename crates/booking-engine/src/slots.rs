//! Hourly room occupancy for a single calendar day.
//!
//! Rooms are booked in ten fixed one-hour slots from 08:00 to 18:00. A slot is
//! occupied iff some meeting *starts* in that hour on that day. Only the start
//! hour is compared: a meeting starting at 09:30 occupies the 09:00 slot and
//! nothing else, and meetings longer than an hour do not spill into later
//! slots. [`crate::overlap`] reports the intervals this model cannot see.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{BookingError, Result};
use crate::model::Meeting;

/// Hour of the first bookable slot.
pub const FIRST_SLOT_HOUR: u32 = 8;
/// Hour of the last bookable slot (it ends at 18:00).
pub const LAST_SLOT_HOUR: u32 = 17;
/// Number of slots in a day.
pub const SLOT_COUNT: usize = 10;

/// Labels of the bookable slots, in chronological order.
pub const SLOT_LABELS: [&str; SLOT_COUNT] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];

/// One hourly slot of a room-day, tagged with its occupying meeting if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// `"HH:00"` label of the slot start.
    pub time: String,
    pub hour: u32,
    pub is_occupied: bool,
    /// First meeting (in input order) starting in this hour.
    pub meeting: Option<Meeting>,
}

/// Whether `hour` starts one of the fixed slots.
pub fn is_slot_hour(hour: u32) -> bool {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour)
}

/// Map a slot label such as `"09:00"` to its hour.
///
/// # Errors
/// Returns `BookingError::UnknownSlot` for anything outside [`SLOT_LABELS`].
pub fn slot_hour(label: &str) -> Result<u32> {
    SLOT_LABELS
        .iter()
        .position(|l| *l == label.trim())
        .map(|idx| FIRST_SLOT_HOUR + idx as u32)
        .ok_or_else(|| BookingError::UnknownSlot(label.to_string()))
}

/// The `[start, end)` window of the slot starting at `hour` on `day`, with the
/// wall-clock time taken in `tz`.
///
/// # Errors
/// Returns `BookingError::UnknownSlot` if `hour` is not a slot hour, and
/// `BookingError::InvalidTimestamp` if the wall-clock time does not exist in
/// `tz` (a DST gap).
pub fn slot_window(day: NaiveDate, hour: u32, tz: Tz) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if !is_slot_hour(hour) {
        return Err(BookingError::UnknownSlot(format!("{:02}:00", hour)));
    }
    let local = day
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| BookingError::UnknownSlot(format!("{:02}:00", hour)))?;
    // An ambiguous wall-clock time (DST fold) resolves to its first occurrence.
    let start = tz
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| {
            BookingError::InvalidTimestamp(format!("{} does not exist in {}", local, tz.name()))
        })?
        .with_timezone(&Utc);
    Ok((start, start + Duration::hours(1)))
}

/// Compute the occupancy of the ten daily slots, evaluating days and hours in UTC.
///
/// Equivalent to [`compute_daily_slots_in`] with `Tz::UTC`.
pub fn compute_daily_slots(meetings: &[Meeting], day: NaiveDate) -> Vec<TimeSlot> {
    compute_daily_slots_in(meetings, day, Tz::UTC)
}

/// Compute the occupancy of the ten daily slots for one room.
///
/// `meetings` may span several days; only meetings whose start falls on `day`
/// (as seen in `tz`) count. The result always holds exactly [`SLOT_COUNT`]
/// slots in chronological order. When several meetings start in the same
/// hour, the first one in `meetings` is reported.
pub fn compute_daily_slots_in(meetings: &[Meeting], day: NaiveDate, tz: Tz) -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .map(|hour| {
            let meeting = meetings
                .iter()
                .find(|m| {
                    let local = m.start_time.with_timezone(&tz);
                    local.date_naive() == day && local.hour() == hour
                })
                .cloned();
            TimeSlot {
                time: format!("{:02}:00", hour),
                hour,
                is_occupied: meeting.is_some(),
                meeting,
            }
        })
        .collect()
}

/// Labels of the free slots in `slots`, in order.
pub fn free_labels(slots: &[TimeSlot]) -> Vec<&str> {
    slots
        .iter()
        .filter(|s| !s.is_occupied)
        .map(|s| s.time.as_str())
        .collect()
}
