//! SkillSwap Realtime Library
//!
//! This crate contains the realtime server components for SkillSwap:
//! presence tracking and meeting signaling over WebSockets, with chat
//! events pushed down the same connections.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod websocket;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
