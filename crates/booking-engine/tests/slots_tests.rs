//! Tests for room-day slot occupancy.

use booking_engine::slots::{free_labels, slot_hour, SLOT_COUNT};
use booking_engine::{compute_daily_slots, compute_daily_slots_in, Meeting, SLOT_LABELS};
use chrono::{Duration, NaiveDate};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn meeting(id: &str, start: &str) -> Meeting {
    let start_time = booking_engine::timestamp::parse_timestamp(start).unwrap();
    Meeting {
        id: id.to_string(),
        title: format!("Meeting {}", id),
        description: None,
        start_time,
        end_time: start_time + Duration::hours(1),
        room_id: "room-a".to_string(),
        user_id: "user-1".to_string(),
        created_at: None,
        updated_at: None,
        room: None,
        user: None,
    }
}

fn june_10() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

// ── Scenario A: empty day ───────────────────────────────────────────────────

#[test]
fn empty_meeting_list_yields_ten_free_slots() {
    let slots = compute_daily_slots(&[], june_10());

    assert_eq!(slots.len(), SLOT_COUNT);
    assert!(slots.iter().all(|s| !s.is_occupied && s.meeting.is_none()));
    let labels: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(labels, SLOT_LABELS.to_vec());
}

// ── Scenario B: one meeting at 09:00 ────────────────────────────────────────

#[test]
fn single_meeting_occupies_its_start_hour() {
    let m = meeting("m1", "2024-06-10T09:00:00");
    let slots = compute_daily_slots(std::slice::from_ref(&m), june_10());

    assert_eq!(slots.len(), 10);
    let nine = &slots[1];
    assert_eq!(nine.time, "09:00");
    assert!(nine.is_occupied);
    assert_eq!(nine.meeting.as_ref(), Some(&m));

    let free: Vec<&str> = free_labels(&slots);
    assert_eq!(free.len(), 9);
    assert!(!free.contains(&"09:00"));
}

// ── Day filtering ───────────────────────────────────────────────────────────

#[test]
fn meetings_on_other_days_are_ignored() {
    let meetings = vec![
        meeting("yesterday", "2024-06-09T10:00:00"),
        meeting("tomorrow", "2024-06-11T10:00:00"),
    ];
    let slots = compute_daily_slots(&meetings, june_10());

    assert!(slots.iter().all(|s| !s.is_occupied));
}

#[test]
fn meetings_outside_business_hours_are_ignored() {
    let meetings = vec![
        meeting("early", "2024-06-10T07:00:00"),
        meeting("late", "2024-06-10T18:00:00"),
    ];
    let slots = compute_daily_slots(&meetings, june_10());

    assert!(slots.iter().all(|s| !s.is_occupied));
}

// ── Start-hour-only comparison ──────────────────────────────────────────────

#[test]
fn off_grid_start_occupies_the_slot_of_its_hour_only() {
    // 09:30-10:30 occupies 09:00; 10:00 stays free even though it overlaps.
    let m = meeting("half", "2024-06-10T09:30:00");
    let slots = compute_daily_slots(&[m], june_10());

    assert!(slots[1].is_occupied);
    assert!(!slots[2].is_occupied);
}

#[test]
fn first_meeting_wins_when_two_share_a_start_hour() {
    let meetings = vec![
        meeting("first", "2024-06-10T14:00:00"),
        meeting("second", "2024-06-10T14:00:00"),
    ];
    let slots = compute_daily_slots(&meetings, june_10());

    let idx = (slot_hour("14:00").unwrap() - 8) as usize;
    assert_eq!(slots[idx].meeting.as_ref().map(|m| m.id.as_str()), Some("first"));
    assert_eq!(slots.iter().filter(|s| s.is_occupied).count(), 1);
}

#[test]
fn last_slot_is_seventeen_hundred() {
    let m = meeting("late", "2024-06-10T17:00:00Z");
    let slots = compute_daily_slots(&[m], june_10());

    assert_eq!(slots[9].time, "17:00");
    assert!(slots[9].is_occupied);
}

// ── Timezone-aware evaluation ───────────────────────────────────────────────

#[test]
fn day_and_hour_follow_the_requested_timezone() {
    // 12:00 UTC is 09:00 in Sao Paulo (UTC-3).
    let m = meeting("sp", "2024-06-10T12:00:00Z");
    let slots = compute_daily_slots_in(&[m], june_10(), chrono_tz::America::Sao_Paulo);

    assert!(slots[1].is_occupied, "09:00 local should be occupied");
    assert!(!slots[4].is_occupied, "12:00 local should be free");
}

#[test]
fn late_utc_meeting_belongs_to_the_previous_local_day() {
    // 2024-06-11T01:00Z is 2024-06-10 22:00 in Sao Paulo: outside the grid on
    // the 10th and not on the 11th at all.
    let m = meeting("night", "2024-06-11T01:00:00Z");
    let tz = chrono_tz::America::Sao_Paulo;

    let tenth = compute_daily_slots_in(std::slice::from_ref(&m), june_10(), tz);
    let eleventh = compute_daily_slots_in(&[m], NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(), tz);

    assert!(tenth.iter().all(|s| !s.is_occupied));
    assert!(eleventh.iter().all(|s| !s.is_occupied));
}

#[test]
fn computation_is_idempotent() {
    let meetings = vec![
        meeting("a", "2024-06-10T08:00:00"),
        meeting("b", "2024-06-10T13:00:00"),
    ];
    assert_eq!(
        compute_daily_slots(&meetings, june_10()),
        compute_daily_slots(&meetings, june_10())
    );
}
