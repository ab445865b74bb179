//! `roombook` CLI — room availability, booking checks and the booking store.
//!
//! ## Usage
//!
//! ```sh
//! # Hourly occupancy of a room-day, from a meetings JSON array
//! roombook slots --date 2024-06-10 -i meetings.json
//!
//! # Same, as JSON, with the day evaluated in Sao Paulo time
//! cat meetings.json | roombook slots --date 2024-06-10 --tz America/Sao_Paulo --json
//!
//! # Would booking 10:00 be accepted, given these existing bookings?
//! roombook check --date 2024-06-11 --time 10:00 -i mine.json
//!
//! # Same-room meetings whose intervals intersect
//! roombook overlaps -i meetings.json
//!
//! # Sign in and keep the token for later calls
//! export ROOMBOOK_TOKEN=$(roombook login --email ana@example.com --password secret1)
//!
//! # Book, look around, cancel
//! roombook availability --room ROOM_ID --date 2024-06-11
//! roombook book --room ROOM_ID --date 2024-06-11 --time 10:00 --title "Planning"
//! roombook dashboard
//! roombook cancel --id MEETING_ID
//! ```
//!
//! The store location and timezone come from `ROOMBOOK_API_URL`,
//! `ROOMBOOK_TIMEOUT_SECS` and `ROOMBOOK_TZ`, optionally via a `.env` file.
//! Set `RUST_LOG` to see request logs on stderr.

use anyhow::{Context, Result};
use booking_client::workflow::{self, BookingRequest};
use booking_client::{ApiClient, ApiError, ClientConfig, Session};
use booking_engine::forms::Registration;
use booking_engine::model::meetings_from_json;
use booking_engine::slots::{compute_daily_slots_in, free_labels, TimeSlot};
use booking_engine::summary::summarize;
use booking_engine::timestamp::{parse_timestamp, parse_timezone};
use booking_engine::{
    find_overlaps, validate_new_booking_in, BookingProposal, Meeting, NewRoom, Room, Snapshot,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "roombook",
    version,
    about = "Meeting-room availability and bookings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bearer token from `roombook login`
    #[arg(long, env = "ROOMBOOK_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ten hourly slots of a day and which are taken
    Slots {
        /// Meetings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Day to lay out, as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// IANA timezone in which the day and hours are read
        #[arg(long, env = "ROOMBOOK_TZ", default_value = "UTC")]
        tz: String,
        /// Print the slots as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether a new booking would be accepted
    Check {
        /// The user's existing meetings as JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Day of the booking, as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Slot start, one of 08:00 .. 17:00
        #[arg(long)]
        time: Option<String>,
        /// Evaluation time (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
        /// IANA timezone in which the day and slot are read
        #[arg(long, env = "ROOMBOOK_TZ", default_value = "UTC")]
        tz: String,
    },
    /// List same-room meetings whose time ranges intersect
    Overlaps {
        /// Meetings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Sign in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ROOMBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and print the session token
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the signed-in user
    Whoami,
    /// List rooms
    Rooms,
    /// Show one room's slots for a day, as the store reports them
    Availability {
        #[arg(long)]
        room: String,
        #[arg(long)]
        date: NaiveDate,
    },
    /// List your meetings
    Meetings,
    /// Book one hourly slot
    Book {
        #[arg(long)]
        room: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Cancel one of your meetings
    Cancel {
        #[arg(long)]
        id: String,
    },
    /// Today's meetings, the next few, and totals
    Dashboard,
    /// Add a room
    CreateRoom {
        #[arg(long)]
        name: String,
        #[arg(long)]
        capacity: u32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Remove a room
    DeleteRoom {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    run(cli).await.map_err(|err| {
        let unauthorized = err
            .downcast_ref::<ApiError>()
            .is_some_and(ApiError::is_unauthorized);
        if unauthorized {
            err.context("session ended; sign in again with `roombook login`")
        } else {
            err
        }
    })
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Slots {
            input,
            date,
            tz,
            json,
        } => {
            let meetings = read_meetings(input.as_deref())?;
            let tz = timezone(&tz)?;
            let slots = compute_daily_slots_in(&meetings, date, tz);
            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                print_slots(&slots);
            }
        }
        Commands::Check {
            input,
            date,
            time,
            now,
            tz,
        } => {
            let meetings = read_meetings(input.as_deref())?;
            let tz = timezone(&tz)?;
            let now = match now {
                Some(raw) => parse_timestamp(&raw).context("Invalid --now")?,
                None => Utc::now(),
            };
            let proposal = match (date, time.as_deref()) {
                (Some(day), Some(slot)) => Some(
                    BookingProposal::from_selection(day, slot, tz).context("Invalid --time")?,
                ),
                _ => None,
            };
            let accepted = validate_new_booking_in(
                &meetings,
                proposal.map(|p| p.start),
                proposal.map(|p| p.end),
                now,
                tz,
            )
            .context("Booking would be rejected")?;
            println!(
                "accepted: {} to {}",
                accepted.start.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                accepted.end.with_timezone(&tz).format("%H:%M")
            );
        }
        Commands::Overlaps { input } => {
            let meetings = read_meetings(input.as_deref())?;
            let overlaps = find_overlaps(&meetings);
            if overlaps.is_empty() {
                println!("no overlapping meetings");
            }
            for overlap in &overlaps {
                println!(
                    "{}: '{}' and '{}' overlap by {} min",
                    overlap.first.room_id,
                    overlap.first.title,
                    overlap.second.title,
                    overlap.overlap_minutes
                );
            }
        }
        Commands::Login { email, password } => {
            let client = client()?;
            let session = client.login(&email, &password).await?;
            eprintln!("signed in as {}", session.user().email);
            println!("{}", session.token());
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let client = client()?;
            let form = Registration {
                name,
                email,
                password,
                confirm_password,
            };
            let session = client.register(&form).await?;
            eprintln!("account created for {}", session.user().email);
            println!("{}", session.token());
        }
        Commands::Whoami => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let user = session.user();
            println!("{} <{}>", user.name, user.email);
        }
        Commands::Rooms => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            for room in client.list_rooms(&session).await? {
                print_room(&room);
            }
        }
        Commands::Availability { room, date } => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let slots = workflow::room_availability(&client, &session, &room, date).await?;
            print_slots(&slots);
        }
        Commands::Meetings => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let meetings = Snapshot::from(client.list_meetings(&session).await?);
            for meeting in meetings.sorted_by_start() {
                println!("{}", meeting_line(meeting, client.timezone()));
            }
        }
        Commands::Book {
            room,
            date,
            time,
            title,
            description,
        } => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let mut meetings = Snapshot::from(client.list_meetings(&session).await?);
            let request = BookingRequest {
                room_id: room,
                title,
                description,
                day: date,
                slot: time,
            };
            let created =
                workflow::book(&client, &session, &mut meetings, &request, Utc::now()).await?;
            println!("booked {}", meeting_line(&created, client.timezone()));
        }
        Commands::Cancel { id } => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let mut meetings = Snapshot::new();
            workflow::cancel(&client, &session, &mut meetings, &id).await?;
            println!("cancelled {}", id);
        }
        Commands::Dashboard => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let mut meetings = Snapshot::new();
            let mut rooms = Snapshot::new();
            workflow::refresh(&client, &session, &mut meetings, &mut rooms).await?;
            let tz = client.timezone();
            let summary = summarize(&meetings, &rooms, Utc::now(), tz);

            println!("Hello, {}", session.user().name);
            println!("Rooms:     {}", summary.total_rooms);
            println!("Meetings:  {}", summary.total_meetings);
            println!("Today:");
            for meeting in &summary.today {
                println!("  {}", meeting_line(meeting, tz));
            }
            println!("Upcoming:");
            for meeting in &summary.upcoming {
                println!("  {}", meeting_line(meeting, tz));
            }
        }
        Commands::CreateRoom {
            name,
            capacity,
            description,
            location,
        } => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let mut rooms = Snapshot::new();
            let room = NewRoom {
                name,
                description,
                capacity,
                location,
            };
            let created = workflow::add_room(&client, &session, &mut rooms, &room).await?;
            print_room(&created);
        }
        Commands::DeleteRoom { id } => {
            let client = client()?;
            let session = session(&client, cli.token.as_deref()).await?;
            let mut rooms: Snapshot<Room> = Snapshot::new();
            workflow::remove_room(&client, &session, &mut rooms, &id).await?;
            println!("deleted room {}", id);
        }
    }

    Ok(())
}

fn client() -> Result<ApiClient> {
    let config = ClientConfig::from_env().context("Failed to load client configuration")?;
    Ok(ApiClient::new(&config)?)
}

async fn session(client: &ApiClient, token: Option<&str>) -> Result<Session> {
    let token = token
        .context("Not signed in: pass --token or set ROOMBOOK_TOKEN (see `roombook login`)")?;
    Ok(client.resume(token).await?)
}

fn timezone(name: &str) -> Result<Tz> {
    parse_timezone(name).with_context(|| format!("Invalid --tz '{}'", name))
}

fn read_meetings(path: Option<&str>) -> Result<Vec<Meeting>> {
    let json = read_input(path)?;
    meetings_from_json(&json).context("Failed to parse meetings JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_slots(slots: &[TimeSlot]) {
    for slot in slots {
        match &slot.meeting {
            Some(meeting) => println!("{}  busy  {} ({})", slot.time, meeting.title, meeting.id),
            None => println!("{}  free", slot.time),
        }
    }
    println!("{} of {} free", free_labels(slots).len(), slots.len());
}

fn print_room(room: &Room) {
    let location = room.location.as_deref().unwrap_or("-");
    println!("{}  {}  capacity {}  {}", room.id, room.name, room.capacity, location);
}

fn meeting_line(meeting: &Meeting, tz: Tz) -> String {
    format!(
        "{} to {}  {}  room {}  ({})",
        meeting.start_time.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
        meeting.end_time.with_timezone(&tz).format("%H:%M"),
        meeting.title,
        meeting.room_id,
        meeting.id
    )
}
