//! HTTP access to the booking store.

use std::net::IpAddr;

use booking_engine::forms::Registration;
use booking_engine::{
    AuthResponse, Meeting, MeetingUpdate, NewMeeting, NewRoom, Room, RoomUpdate, User,
};
use chrono::NaiveDate;
use chrono_tz::Tz;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::endpoint::Endpoint;
use crate::error::{from_status, ApiError, Result};
use crate::session::Session;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUp<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct MeResponse {
    user: User,
}

/// A `reqwest::Client` bound to the store's base URL.
///
/// Every call except [`login`](Self::login), [`register`](Self::register) and
/// [`resume`](Self::resume) takes the [`Session`] whose bearer token it sends.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timezone: Tz,
}

impl ApiClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the base URL cannot take path segments or
    /// the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ApiError::Config(format!("invalid API URL '{}': {}", config.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "API URL '{}' cannot be used as a base",
                config.api_url
            )));
        }
        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            base_url,
            timezone: config.timezone,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Timezone in which days and slot hours are evaluated for this store.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Absolute URL of `endpoint`, with each segment percent-encoded.
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::Config(format!(
                    "API URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?;
            segments.pop_if_empty().extend(endpoint.segments());
        }
        Ok(url)
    }

    // ── Authentication ──────────────────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = Credentials { email, password };
        let auth: AuthResponse = self
            .fetch(Method::POST, &Endpoint::login(), None, Some(&body))
            .await?;
        Ok(Session::new(auth.token, auth.user))
    }

    /// Sign up. The form is checked locally first; nothing is sent if it fails.
    pub async fn register(&self, form: &Registration) -> Result<Session> {
        form.validate()?;
        let body = SignUp {
            name: &form.name,
            email: &form.email,
            password: &form.password,
        };
        let auth: AuthResponse = self
            .fetch(Method::POST, &Endpoint::register(), None, Some(&body))
            .await?;
        Ok(Session::new(auth.token, auth.user))
    }

    /// Turn a previously issued token back into a session, if the store still
    /// accepts it.
    pub async fn resume(&self, token: &str) -> Result<Session> {
        let me: MeResponse = self
            .fetch(Method::GET, &Endpoint::me(), Some(token), None::<&()>)
            .await?;
        Ok(Session::new(token.to_string(), me.user))
    }

    pub async fn me(&self, session: &Session) -> Result<User> {
        let me: MeResponse = self.get(&Endpoint::me(), session).await?;
        Ok(me.user)
    }

    // ── Meetings ────────────────────────────────────────────────────────────

    /// Meetings visible to the session's user.
    pub async fn list_meetings(&self, session: &Session) -> Result<Vec<Meeting>> {
        self.get(&Endpoint::meetings(), session).await
    }

    pub async fn create_meeting(&self, session: &Session, meeting: &NewMeeting) -> Result<Meeting> {
        meeting.validate()?;
        self.fetch(Method::POST, &Endpoint::meetings(), Some(session.token()), Some(meeting))
            .await
    }

    pub async fn update_meeting(
        &self,
        session: &Session,
        id: &str,
        update: &MeetingUpdate,
    ) -> Result<Meeting> {
        self.fetch(Method::PUT, &Endpoint::meeting(id), Some(session.token()), Some(update))
            .await
    }

    pub async fn delete_meeting(&self, session: &Session, id: &str) -> Result<()> {
        self.execute(Method::DELETE, &Endpoint::meeting(id), Some(session.token()), None::<&()>)
            .await?;
        Ok(())
    }

    // ── Rooms ───────────────────────────────────────────────────────────────

    pub async fn list_rooms(&self, session: &Session) -> Result<Vec<Room>> {
        self.get(&Endpoint::rooms(), session).await
    }

    /// Meetings of `room_id` on `day`, as the store filters them.
    pub async fn room_meetings(
        &self,
        session: &Session,
        room_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<Meeting>> {
        self.get(&Endpoint::room_meetings(room_id, day), session).await
    }

    pub async fn create_room(&self, session: &Session, room: &NewRoom) -> Result<Room> {
        room.validate()?;
        self.fetch(Method::POST, &Endpoint::rooms(), Some(session.token()), Some(room))
            .await
    }

    pub async fn update_room(
        &self,
        session: &Session,
        id: &str,
        update: &RoomUpdate,
    ) -> Result<Room> {
        self.fetch(Method::PUT, &Endpoint::room(id), Some(session.token()), Some(update))
            .await
    }

    pub async fn delete_room(&self, session: &Session, id: &str) -> Result<()> {
        self.execute(Method::DELETE, &Endpoint::room(id), Some(session.token()), None::<&()>)
            .await?;
        Ok(())
    }

    // ── Plumbing ────────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint, session: &Session) -> Result<T> {
        self.fetch(Method::GET, endpoint, Some(session.token()), None::<&()>)
            .await
    }

    async fn fetch<B, T>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method, endpoint, token, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", endpoint, e)))
    }

    /// Send one request and turn any non-2xx answer into an [`ApiError`].
    #[tracing::instrument(level = "debug", skip(self, token, body))]
    async fn execute<B>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, self.url(endpoint)?);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "request did not complete");
            ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(%status, "request succeeded");
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = from_status(status, &text);
        warn!(%status, error = %err, "request refused");
        Err(err)
    }
}

/// A store on this machine is reached directly, whatever proxy the environment sets.
fn is_loopback(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}
