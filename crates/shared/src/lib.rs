//! SkillSwap Shared Types
//!
//! This crate contains the identifier types and the realtime wire protocol
//! shared between the SkillSwap realtime server and client-side session code.

pub mod protocol;
pub mod types;

pub use protocol::*;
pub use types::*;
