//! # booking-engine
//!
//! Room availability and booking-window rules for meeting-room reservations.
//!
//! Rooms are booked in ten fixed one-hour slots (08:00 to 18:00) and each
//! user may hold at most one booking that has not started yet. This crate
//! computes the per-room hourly occupancy a client shows and decides whether a
//! proposed booking may be submitted. Everything here is pure: the booking
//! store remains the authority on conflicts and persistence.
//!
//! ## Quick start
//!
//! ```rust
//! use booking_engine::{compute_daily_slots, validate_new_booking, RejectionReason};
//! use chrono::{NaiveDate, TimeZone, Utc};
//!
//! let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
//! let slots = compute_daily_slots(&[], day);
//! assert_eq!(slots.len(), 10);
//! assert!(slots.iter().all(|s| !s.is_occupied));
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap();
//! let verdict = validate_new_booking(&[], None, None, now);
//! assert_eq!(verdict, Err(RejectionReason::MissingSelection));
//! ```
//!
//! ## Modules
//!
//! - [`slots`] — fixed slot grid and room-day occupancy
//! - [`validate`] — pre-submission checks for a new booking
//! - [`snapshot`] — local collection copies and id-based reconciliation
//! - [`summary`] — dashboard figures
//! - [`forms`] — registration, room and meeting field checks
//! - [`overlap`] — interval overlaps the slot grid cannot see
//! - [`model`] — wire types shared with the booking store
//! - [`timestamp`] — timestamp and timezone parsing
//! - [`error`] — Error types

pub mod error;
pub mod forms;
pub mod model;
pub mod overlap;
pub mod slots;
pub mod snapshot;
pub mod summary;
pub mod timestamp;
pub mod validate;

pub use error::BookingError;
pub use model::{AuthResponse, Meeting, MeetingUpdate, NewMeeting, NewRoom, Room, RoomUpdate, User};
pub use overlap::find_overlaps;
pub use slots::{compute_daily_slots, compute_daily_slots_in, TimeSlot, SLOT_LABELS};
pub use snapshot::{Identified, Snapshot};
pub use validate::{validate_new_booking, validate_new_booking_in, BookingProposal, RejectionReason};
