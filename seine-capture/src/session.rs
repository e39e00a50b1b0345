//! Capture session records and lifecycle states

use std::fmt;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};

use crate::stats::StatsAccumulator;

/// Lifecycle state of a capture session
///
/// `Created -> Activated -> Looping -> Stopped`, where `Stopped` is
/// terminal and can be reached from any earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Device opened, filter staged, not yet capturing
    Created,
    /// Activated and ready for the capture loop
    Activated,
    /// A capture loop is running against the handle
    Looping,
    /// Stopped; the identity is no longer valid
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Created => "created",
            SessionState::Activated => "activated",
            SessionState::Looping => "looping",
            SessionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// One live capture session: the owned device handle, its staged filter,
/// and the state the lifecycle controller steers.
///
/// The handle is owned exclusively by the session; the capture loop holds
/// the handle lock for its whole run, and `stop` reclaims the handle only
/// after the loop has observed the `Stopped` state and released it.
pub(crate) struct Session<H> {
    pub device: String,
    pub filter: Option<String>,
    pub state: RwLock<SessionState>,
    pub handle: Mutex<Option<H>>,
    pub stats: StatsAccumulator,
    pub created_at: SystemTime,
}

impl<H> Session<H> {
    pub fn new(device: &str, filter: Option<String>, handle: H) -> Self {
        Self {
            device: device.to_string(),
            filter,
            state: RwLock::new(SessionState::Created),
            handle: Mutex::new(Some(handle)),
            stats: StatsAccumulator::new(),
            created_at: SystemTime::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }
}
