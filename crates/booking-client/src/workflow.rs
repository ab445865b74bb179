//! Booking, cancelling and refreshing, with the local snapshots kept in step.
//!
//! Each mutating workflow patches the caller's snapshot by id once the store
//! has accepted the change. A [`refresh`] that runs concurrently may land
//! before or after that patch; whichever is applied last wins.

use booking_engine::slots::{compute_daily_slots_in, TimeSlot};
use booking_engine::{validate_new_booking_in, BookingProposal, Meeting, NewRoom, Room, Snapshot};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;
use crate::session::Session;

/// What the user picked in the booking form. `day` and `slot` stay `None`
/// until chosen.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub room_id: String,
    pub title: String,
    pub description: Option<String>,
    pub day: Option<NaiveDate>,
    /// One of [`booking_engine::SLOT_LABELS`].
    pub slot: Option<String>,
}

/// Validate `request` against `meetings` (the user's own bookings) and, if it
/// passes, create it in the store and add the result to `meetings`.
///
/// A local rejection sends nothing and leaves `meetings` untouched. The store
/// may still refuse an accepted request, e.g. when another user took the slot
/// first; that refusal comes back as [`crate::ApiError::Rejected`].
pub async fn book(
    client: &ApiClient,
    session: &Session,
    meetings: &mut Snapshot<Meeting>,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Meeting> {
    let tz = client.timezone();
    let proposal = match (request.day, request.slot.as_deref()) {
        (Some(day), Some(slot)) => Some(BookingProposal::from_selection(day, slot, tz)?),
        _ => None,
    };

    let accepted = validate_new_booking_in(
        meetings.items(),
        proposal.map(|p| p.start),
        proposal.map(|p| p.end),
        now,
        tz,
    )
    .inspect_err(|reason| info!(%reason, "booking rejected locally"))?;

    let payload = accepted.into_new_meeting(
        request.title.clone(),
        request.room_id.clone(),
        request.description.clone(),
    );
    let created = client.create_meeting(session, &payload).await?;
    info!(meeting_id = %created.id, start = %created.start_time, "meeting booked");
    meetings.upsert(created.clone());
    Ok(created)
}

/// Delete `meeting_id` in the store, then drop it from `meetings`.
///
/// Returns the local copy that was removed, if the snapshot had one.
pub async fn cancel(
    client: &ApiClient,
    session: &Session,
    meetings: &mut Snapshot<Meeting>,
    meeting_id: &str,
) -> Result<Option<Meeting>> {
    client.delete_meeting(session, meeting_id).await?;
    info!(%meeting_id, "meeting cancelled");
    Ok(meetings.remove(meeting_id))
}

/// Create a room and add it to `rooms`.
pub async fn add_room(
    client: &ApiClient,
    session: &Session,
    rooms: &mut Snapshot<Room>,
    room: &NewRoom,
) -> Result<Room> {
    let created = client.create_room(session, room).await?;
    rooms.upsert(created.clone());
    Ok(created)
}

/// Delete a room and drop it from `rooms`.
pub async fn remove_room(
    client: &ApiClient,
    session: &Session,
    rooms: &mut Snapshot<Room>,
    room_id: &str,
) -> Result<Option<Room>> {
    client.delete_room(session, room_id).await?;
    Ok(rooms.remove(room_id))
}

/// Fetch meetings and rooms concurrently and replace both snapshots.
///
/// Neither snapshot changes unless both fetches succeed.
pub async fn refresh(
    client: &ApiClient,
    session: &Session,
    meetings: &mut Snapshot<Meeting>,
    rooms: &mut Snapshot<Room>,
) -> Result<()> {
    let (fresh_meetings, fresh_rooms) =
        tokio::try_join!(client.list_meetings(session), client.list_rooms(session))?;
    meetings.replace_all(fresh_meetings);
    rooms.replace_all(fresh_rooms);
    Ok(())
}

/// Fetch one room's meetings for `day` and lay them out on the slot grid.
pub async fn room_availability(
    client: &ApiClient,
    session: &Session,
    room_id: &str,
    day: NaiveDate,
) -> Result<Vec<TimeSlot>> {
    let meetings = client.room_meetings(session, room_id, day).await?;
    Ok(compute_daily_slots_in(&meetings, day, client.timezone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use booking_engine::timestamp::parse_timestamp;
    use booking_engine::{RejectionReason, User};
    use chrono::Duration;

    /// A client whose base URL points at a port nobody listens on.
    fn offline_client() -> ApiClient {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        ApiClient::new(&ClientConfig {
            api_url: format!("http://127.0.0.1:{}/api", port),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    fn session() -> Session {
        Session::new(
            "token".to_string(),
            User {
                id: "user-1".to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                created_at: None,
            },
        )
    }

    fn meeting(id: &str, start: &str) -> Meeting {
        let start_time = parse_timestamp(start).unwrap();
        Meeting {
            id: id.to_string(),
            title: "Existing".to_string(),
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

    fn request(day: Option<&str>, slot: Option<&str>) -> BookingRequest {
        BookingRequest {
            room_id: "room-a".to_string(),
            title: "Planning".to_string(),
            description: None,
            day: day.map(|d| d.parse().unwrap()),
            slot: slot.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn active_booking_is_rejected_before_any_request() {
        let client = offline_client();
        let mut meetings = Snapshot::from(vec![meeting("future", "2099-01-01T09:00:00")]);
        let now = parse_timestamp("2024-06-10T00:00:00").unwrap();

        let err = book(
            &client,
            &session(),
            &mut meetings,
            &request(Some("2024-06-11"), Some("10:00")),
            now,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Booking(RejectionReason::ActiveBookingExists)
        ));
        assert_eq!(meetings.len(), 1);
    }

    #[tokio::test]
    async fn missing_slot_is_rejected_before_any_request() {
        let client = offline_client();
        let mut meetings = Snapshot::new();
        let now = parse_timestamp("2024-06-10T00:00:00").unwrap();

        let err = book(&client, &session(), &mut meetings, &request(Some("2024-06-11"), None), now)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Booking(RejectionReason::MissingSelection)));
        assert!(meetings.is_empty());
    }

    #[tokio::test]
    async fn unknown_slot_label_is_an_engine_error() {
        let client = offline_client();
        let mut meetings = Snapshot::new();
        let now = parse_timestamp("2024-06-10T00:00:00").unwrap();

        let err = book(
            &client,
            &session(),
            &mut meetings,
            &request(Some("2024-06-11"), Some("19:00")),
            now,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Engine(_)));
    }

    #[tokio::test]
    async fn accepted_booking_reaches_the_network() {
        let client = offline_client();
        let mut meetings = Snapshot::from(vec![meeting("past", "2020-01-01T09:00:00")]);
        let now = parse_timestamp("2024-06-10T00:00:00").unwrap();

        let err = book(
            &client,
            &session(),
            &mut meetings,
            &request(Some("2024-06-11"), Some("10:00")),
            now,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Connection(_)), "got {:?}", err);
        assert_eq!(meetings.len(), 1);
    }

    #[tokio::test]
    async fn failed_cancel_keeps_the_local_copy() {
        let client = offline_client();
        let mut meetings = Snapshot::from(vec![meeting("m1", "2099-01-01T09:00:00")]);

        let err = cancel(&client, &session(), &mut meetings, "m1").await.unwrap_err();

        assert!(matches!(err, ApiError::Connection(_)));
        assert!(meetings.get("m1").is_some());
    }

    #[tokio::test]
    async fn failed_refresh_leaves_snapshots_untouched() {
        let client = offline_client();
        let mut meetings = Snapshot::from(vec![meeting("m1", "2099-01-01T09:00:00")]);
        let mut rooms: Snapshot<Room> = Snapshot::new();

        assert!(refresh(&client, &session(), &mut meetings, &mut rooms).await.is_err());
        assert_eq!(meetings.len(), 1);
        assert!(rooms.is_empty());
    }
}
