//! SkillSwap Peer Session Tracking
//!
//! Client-side bookkeeping for multi-party meetings: which peers this
//! client should send offers to, and what to do with ICE candidates that
//! arrive before the remote description. Media and transport live in the
//! browser; this crate only tracks ordering.

pub mod directory;

pub use directory::{CandidateDisposition, PeerDirectory};
