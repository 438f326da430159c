// skola-api: Async Rust client for the Skola learning-platform gateway

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod poll;
pub mod transport;

pub use auth::Credentials;
pub use client::ApiClient;
pub use error::Error;
pub use poll::{PollOptions, poll_job};
