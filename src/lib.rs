//! Typed client for the Mass Production project tracking backend.
//!
//! [`client::ApiClient`] is the single authenticated entry point; the
//! [`api`] module wraps each backend resource on top of it. Progress
//! checklists are decoded into [`models::Stage`] and rolled up per project
//! by [`progress::completion_percentage`].

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod progress;
pub mod session;
pub mod timing;
pub mod ui;

pub use client::ApiClient;
pub use errors::{ClientError, SessionError, ValidationError};
pub use session::{SessionStore, StaticToken, TokenProvider};
