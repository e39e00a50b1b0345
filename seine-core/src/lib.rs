//! Seine Core Library
//!
//! This crate provides the fundamental types and error handling for the
//! seine packet capture engine: the session identity, the captured packet
//! representation, and the error taxonomy shared by every other crate.

pub mod error;
pub mod packet;
pub mod session_id;

// Re-export commonly used types
pub use error::{ActivationFailure, Error, Result};
pub use packet::CapturedPacket;
pub use session_id::SessionId;
