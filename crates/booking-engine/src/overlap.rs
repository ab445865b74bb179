//! Detect meetings of the same room whose time ranges overlap.
//!
//! The hourly occupancy grid only looks at start hours, so a 09:30 meeting and
//! a 10:00 meeting in the same room show up as two separate occupied slots.
//! This module reports such pairs. It is a diagnostic and never feeds back
//! into slot occupancy. Adjacent meetings (one ends exactly when the next
//! starts) do NOT overlap.

use serde::Serialize;

use crate::model::Meeting;

/// Two meetings of one room whose intervals intersect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    pub first: Meeting,
    pub second: Meeting,
    pub overlap_minutes: i64,
}

/// Find every overlapping pair of meetings that share a room.
///
/// Two meetings overlap when `a.start < b.end && b.start < a.end`. The overlap
/// duration is `min(a.end, b.end) - max(a.start, b.start)`. Each pair is
/// reported once, with `first` preceding `second` in the input. Meetings whose
/// end is not after their start are skipped.
pub fn find_overlaps(meetings: &[Meeting]) -> Vec<Overlap> {
    let mut overlaps = Vec::new();

    for (idx, a) in meetings.iter().enumerate() {
        if a.end_time <= a.start_time {
            continue;
        }
        for b in &meetings[idx + 1..] {
            if a.room_id != b.room_id || b.end_time <= b.start_time {
                continue;
            }
            if a.start_time < b.end_time && b.start_time < a.end_time {
                let overlap_start = a.start_time.max(b.start_time);
                let overlap_end = a.end_time.min(b.end_time);
                overlaps.push(Overlap {
                    first: a.clone(),
                    second: b.clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    overlaps
}
