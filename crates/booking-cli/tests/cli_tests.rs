//! Integration tests for the `roombook` CLI binary.
//!
//! The offline subcommands (slots, check, overlaps) are exercised through the
//! actual binary with a fixture of four meetings: m1 09:00 and m2 09:30 in
//! room-a and m3 14:00 in room-b on 2024-06-10, and m4 10:00 in room-a on
//! 2024-06-11 (all UTC).

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the meetings.json fixture.
fn meetings_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/meetings.json")
}

/// Helper: the binary with no store settings leaking in from the environment.
fn roombook() -> Command {
    let mut cmd = Command::cargo_bin("roombook").unwrap();
    cmd.env_remove("ROOMBOOK_TZ")
        .env_remove("ROOMBOOK_TOKEN")
        .env_remove("ROOMBOOK_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Slots subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_with_no_meetings_are_all_free() {
    roombook()
        .args(["slots", "--date", "2024-06-10"])
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::contains("08:00  free"))
        .stdout(predicate::str::contains("17:00  free"))
        .stdout(predicate::str::contains("10 of 10 free"));
}

#[test]
fn slots_mark_start_hours_of_the_day() {
    roombook()
        .args(["slots", "--date", "2024-06-10", "-i", meetings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00  busy  Standup (m1)"))
        .stdout(predicate::str::contains("14:00  busy  Planning (m3)"))
        .stdout(predicate::str::contains("10:00  free"))
        .stdout(predicate::str::contains("8 of 10 free"));
}

#[test]
fn slots_ignore_other_days() {
    roombook()
        .args(["slots", "--date", "2024-06-11", "-i", meetings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00  busy  Retro (m4)"))
        .stdout(predicate::str::contains("9 of 10 free"));
}

#[test]
fn slots_json_output() {
    let output = roombook()
        .args(["slots", "--date", "2024-06-10", "--json", "-i", meetings_path()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let slots: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 10);
    assert_eq!(slots[0]["time"], "08:00");
    assert_eq!(slots[0]["isOccupied"], false);
    assert_eq!(slots[1]["time"], "09:00");
    assert_eq!(slots[1]["isOccupied"], true);
    assert_eq!(slots[1]["meeting"]["id"], "m1");
    assert_eq!(slots[9]["time"], "17:00");
}

#[test]
fn slots_in_another_timezone() {
    // June in Sao Paulo is UTC-3: 14:00Z is 11:00, 09:00Z falls before the grid.
    roombook()
        .args([
            "slots",
            "--date",
            "2024-06-10",
            "--tz",
            "America/Sao_Paulo",
            "-i",
            meetings_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("11:00  busy  Planning (m3)"))
        .stdout(predicate::str::contains("09:00  free"))
        .stdout(predicate::str::contains("9 of 10 free"));
}

#[test]
fn slots_timezone_from_environment() {
    roombook()
        .env("ROOMBOOK_TZ", "America/Sao_Paulo")
        .args(["slots", "--date", "2024-06-10", "-i", meetings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("11:00  busy  Planning (m3)"));
}

#[test]
fn slots_unknown_timezone_fails() {
    roombook()
        .args(["slots", "--date", "2024-06-10", "--tz", "Mars/Olympus"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --tz"));
}

#[test]
fn slots_invalid_json_fails() {
    roombook()
        .args(["slots", "--date", "2024-06-10"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse meetings JSON"));
}

#[test]
fn slots_missing_file_fails() {
    roombook()
        .args(["slots", "--date", "2024-06-10", "-i", "/nonexistent/meetings.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn slots_bad_date_is_a_usage_error() {
    roombook()
        .args(["slots", "--date", "10/06/2024"])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--date"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_accepts_when_all_bookings_are_past() {
    roombook()
        .args([
            "check",
            "--date",
            "2024-06-12",
            "--time",
            "10:00",
            "--now",
            "2024-06-12T00:00:00",
            "-i",
            meetings_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("accepted: 2024-06-12 10:00 to 11:00"));
}

#[test]
fn check_rejects_when_a_booking_is_upcoming() {
    roombook()
        .args([
            "check",
            "--date",
            "2024-06-12",
            "--time",
            "10:00",
            "--now",
            "2024-06-10T00:00:00",
            "-i",
            meetings_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already have an open booking"));
}

#[test]
fn check_without_time_is_missing_selection() {
    roombook()
        .args([
            "check",
            "--date",
            "2024-06-12",
            "--now",
            "2024-06-10T00:00:00",
            "-i",
            meetings_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("select a date and a time slot"));
}

#[test]
fn check_rejects_a_slot_that_already_started() {
    roombook()
        .args([
            "check",
            "--date",
            "2024-06-12",
            "--time",
            "10:00",
            "--now",
            "2024-06-12T12:00:00",
        ])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("in the past"));
}

#[test]
fn check_unknown_slot_label_fails() {
    roombook()
        .args([
            "check",
            "--date",
            "2024-06-12",
            "--time",
            "19:00",
            "--now",
            "2024-06-10T00:00:00",
        ])
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --time"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlaps subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn overlaps_reports_same_room_pairs() {
    roombook()
        .args(["overlaps", "-i", meetings_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "room-a: 'Standup' and 'Review' overlap by 30 min",
        ))
        .stdout(predicate::str::contains("Planning").not());
}

#[test]
fn overlaps_none() {
    roombook()
        .arg("overlaps")
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::contains("no overlapping meetings"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Store subcommands that fail before any request
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn whoami_without_token_asks_to_sign_in() {
    roombook()
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn register_with_mismatched_passwords_fails_locally() {
    roombook()
        .args([
            "register",
            "--name",
            "Ana",
            "--email",
            "ana@example.com",
            "--password",
            "secret1",
            "--confirm-password",
            "secret2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("passwords do not match"));
}

#[test]
fn no_subcommand_prints_usage() {
    roombook()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
