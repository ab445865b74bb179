//! WASM bindings for booking-engine.
//!
//! Exposes the daily slot grid, the new-booking check and overlap detection to
//! JavaScript via `wasm-bindgen`. Meetings cross the boundary as the JSON the
//! booking store returns (`startTime`, `endTime`, `roomId`, ...), and results
//! come back as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/booking-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::model::meetings_from_json;
use booking_engine::timestamp::{parse_timestamp, parse_timezone};
use booking_engine::{compute_daily_slots_in, find_overlaps, validate_new_booking_in, Meeting};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Outcome of `validateNewBooking`. A rejection is a normal answer, not an
/// exception; only malformed input throws.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VerdictDto {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<booking_engine::RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn parse_meetings(json: &str) -> Result<Vec<Meeting>, String> {
    meetings_from_json(json).map_err(|e| format!("Invalid meetings JSON: {}", e))
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid day '{}': {}", s, e))
}

fn parse_tz(tz: Option<&str>) -> Result<Tz, String> {
    match tz {
        Some(name) => parse_timezone(name).map_err(|e| e.to_string()),
        None => Ok(Tz::UTC),
    }
}

/// An empty string is an unselected bound, the same as `undefined`.
fn parse_bound(s: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    s.filter(|s| !s.trim().is_empty())
        .map(|s| parse_timestamp(s).map_err(|e| e.to_string()))
        .transpose()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Implementations (plain Rust, testable off-wasm)
// ---------------------------------------------------------------------------

fn daily_slots(meetings_json: &str, day: &str, tz: Option<&str>) -> Result<String, String> {
    let meetings = parse_meetings(meetings_json)?;
    let slots = compute_daily_slots_in(&meetings, parse_day(day)?, parse_tz(tz)?);
    to_json(&slots)
}

fn new_booking_verdict(
    meetings_json: &str,
    start: Option<&str>,
    end: Option<&str>,
    now: &str,
    tz: Option<&str>,
) -> Result<String, String> {
    let meetings = parse_meetings(meetings_json)?;
    let now = parse_timestamp(now).map_err(|e| e.to_string())?;
    let verdict = match validate_new_booking_in(
        &meetings,
        parse_bound(start)?,
        parse_bound(end)?,
        now,
        parse_tz(tz)?,
    ) {
        Ok(proposal) => VerdictDto {
            accepted: true,
            start: Some(proposal.start.to_rfc3339()),
            end: Some(proposal.end.to_rfc3339()),
            reason: None,
            message: None,
        },
        Err(reason) => VerdictDto {
            accepted: false,
            start: None,
            end: None,
            reason: Some(reason),
            message: Some(reason.to_string()),
        },
    };
    to_json(&verdict)
}

fn overlaps(meetings_json: &str) -> Result<String, String> {
    to_json(&find_overlaps(&parse_meetings(meetings_json)?))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out one room-day as the ten fixed hourly slots.
///
/// Returns a JSON array of `{time, hour, isOccupied, meeting?}` objects, in
/// slot order.
///
/// # Arguments
/// - `meetings_json` -- JSON array of meetings (usually one room's)
/// - `day` -- calendar day, `YYYY-MM-DD`
/// - `tz` -- optional IANA timezone for the day and hours (default UTC)
#[wasm_bindgen(js_name = "computeDailySlots")]
pub fn compute_daily_slots(
    meetings_json: &str,
    day: &str,
    tz: Option<String>,
) -> Result<String, JsValue> {
    daily_slots(meetings_json, day, tz.as_deref()).map_err(|e| JsValue::from_str(&e))
}

/// Decide whether a new booking may be submitted.
///
/// Returns `{accepted: true, start, end}` or
/// `{accepted: false, reason, message}`, where `reason` is one of
/// `MissingSelection`, `ActiveBookingExists`, `InvalidWindow`, `StartInPast`.
///
/// # Arguments
/// - `meetings_json` -- JSON array of the user's existing meetings
/// - `start`, `end` -- proposed window; `undefined` when not yet selected
/// - `now` -- evaluation time, ISO 8601
/// - `tz` -- optional IANA timezone for the slot grid (default UTC)
#[wasm_bindgen(js_name = "validateNewBooking")]
pub fn validate_new_booking(
    meetings_json: &str,
    start: Option<String>,
    end: Option<String>,
    now: &str,
    tz: Option<String>,
) -> Result<String, JsValue> {
    new_booking_verdict(meetings_json, start.as_deref(), end.as_deref(), now, tz.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Find same-room meetings whose time ranges intersect.
///
/// Returns a JSON array of `{first, second, overlapMinutes}` objects.
#[wasm_bindgen(js_name = "findOverlaps")]
pub fn find_overlapping_meetings(meetings_json: &str) -> Result<String, JsValue> {
    overlaps(meetings_json).map_err(|e| JsValue::from_str(&e))
}
