//! # booking-client
//!
//! Async client for the meeting-room booking store.
//!
//! The store owns users, rooms and meetings and has the final word on every
//! booking. This crate wraps its REST API, carries the signed-in user in an
//! explicit [`Session`], and runs the `booking-engine` checks before anything
//! is submitted.
//!
//! ## Modules
//!
//! - [`client`] — [`ApiClient`], one method per store endpoint
//! - [`session`] — the authenticated [`Session`]
//! - [`workflow`] — book, cancel and refresh with snapshot reconciliation
//! - [`endpoint`] — store paths
//! - [`config`] — environment-driven [`ClientConfig`]
//! - [`error`] — Error types

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod session;
pub mod workflow;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::Session;
pub use workflow::BookingRequest;
