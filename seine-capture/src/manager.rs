//! Session lifecycle controller and capture loop driver
//!
//! The `SessionManager` is the caller-facing surface of the capture
//! engine. It owns every live session and the packet registry, and
//! provides:
//!
//! - Session creation (device open + filter install) and activation
//! - The blocking capture loop that feeds the per-session buffer
//! - Atomic packet drains
//! - Safe stop from a thread other than the one running the loop
//! - Session introspection and graceful shutdown

use std::sync::Arc;
use std::time::SystemTime;

use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use seine_core::{ActivationFailure, CapturedPacket, Error, Result, SessionId};

use crate::binding::{CaptureBinding, CaptureConfig};
use crate::libpcap::PcapBinding;
use crate::registry::PacketRegistry;
use crate::session::{Session, SessionState};
use crate::stats::SessionStats;

/// Snapshot of one live session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Session identity
    pub id: SessionId,
    /// Device the session captures on
    pub device: String,
    /// Installed filter expression, if any
    pub filter: Option<String>,
    /// Current lifecycle state
    pub state: SessionState,
    /// When the session was created
    pub created_at: SystemTime,
    /// Capture statistics
    pub stats: SessionStats,
    /// Packets currently buffered and not yet drained
    pub buffered: usize,
}

/// Manager backed by the system libpcap binding
pub type PcapSessionManager = SessionManager<PcapBinding>;

/// Orchestrates capture sessions over a capture binding.
///
/// All operations take `&self` and are safe to issue from any thread; the
/// one blocking operation is [`run`](SessionManager::run), which occupies
/// the calling thread until [`stop`](SessionManager::stop) breaks the loop
/// or the binding reports an unrecoverable failure.
pub struct SessionManager<B: CaptureBinding> {
    binding: B,
    config: CaptureConfig,
    sessions: DashMap<SessionId, Arc<Session<B::Handle>>>,
    registry: Arc<PacketRegistry>,
}

impl SessionManager<PcapBinding> {
    /// Create a manager backed by the system libpcap binding
    pub fn pcap(config: CaptureConfig) -> Self {
        Self::new(PcapBinding::new(), config)
    }
}

impl<B: CaptureBinding> SessionManager<B> {
    /// Create a manager over the given binding, owning its own registry
    pub fn new(binding: B, config: CaptureConfig) -> Self {
        Self::with_registry(binding, config, Arc::new(PacketRegistry::new()))
    }

    /// Create a manager over the given binding and an injected registry
    pub fn with_registry(
        binding: B,
        config: CaptureConfig,
        registry: Arc<PacketRegistry>,
    ) -> Self {
        Self {
            binding,
            config,
            sessions: DashMap::new(),
            registry,
        }
    }

    /// The packet registry this manager feeds
    pub fn registry(&self) -> &Arc<PacketRegistry> {
        &self.registry
    }

    /// Open a capture session on `device`.
    ///
    /// The capture size is set to the configured snaplen and, if `filter`
    /// is non-empty, the expression is compiled and installed. Any binding
    /// failure after the device opened closes the handle before the error
    /// is surfaced, so no handle leaks. Returns the new session identity.
    pub fn create(&self, device: &str, filter: &str) -> Result<SessionId> {
        debug!(device, filter, "opening capture session");

        let mut handle = self.binding.open(device, &self.config)?;

        if let Err(e) = self.binding.set_snaplen(&mut handle, self.config.snaplen) {
            self.binding.close(handle);
            return Err(e);
        }

        if !filter.is_empty() {
            if let Err(e) = self.binding.install_filter(&mut handle, filter) {
                self.binding.close(handle);
                return Err(e);
            }
        }

        let id = SessionId::new();
        let filter = (!filter.is_empty()).then(|| filter.to_string());
        let session = Session::new(device, filter, handle);
        self.sessions.insert(id, Arc::new(session));

        info!(id = %id, device, "capture session created");
        Ok(id)
    }

    /// Activate a created session.
    ///
    /// Activating a session that is already activated (or looping) fails
    /// with the already-activated condition rather than silently
    /// succeeding. On failure the session stays created and may be
    /// retried or stopped.
    pub fn activate(&self, id: SessionId) -> Result<()> {
        let session = self.session(id)?;

        let mut state = session.state.write();
        match *state {
            SessionState::Created => {}
            SessionState::Activated | SessionState::Looping => {
                return Err(Error::Activation {
                    session: id.to_string(),
                    kind: ActivationFailure::AlreadyActivated,
                });
            }
            SessionState::Stopped => return Err(Error::UnknownSession(id)),
        }

        // Holding the state write lock here is safe: no capture loop can
        // own the handle while the session is still in the created state.
        let mut guard = session.handle.lock();
        let handle = guard.as_mut().ok_or(Error::UnknownSession(id))?;

        self.binding
            .activate(handle)
            .map_err(|e| e.for_session(id))
            .inspect_err(|e| warn!(id = %id, error = %e, "activation failed"))?;

        *state = SessionState::Activated;
        info!(id = %id, device = %session.device, "capture session activated");
        Ok(())
    }

    /// Run the capture loop for a session, blocking the calling thread.
    ///
    /// Every captured frame is appended to the session's buffer in capture
    /// order. Returns when [`stop`](SessionManager::stop) breaks the loop
    /// (`Ok`), or when the binding reports an unrecoverable failure, in
    /// which case the session is moved to its stopped state, the handle is
    /// released, and the failure is surfaced.
    pub fn run(&self, id: SessionId) -> Result<()> {
        let session = self.session(id)?;

        {
            let mut state = session.state.write();
            match *state {
                SessionState::Activated => *state = SessionState::Looping,
                SessionState::Created => {
                    return Err(Error::capture_loop(
                        id.to_string(),
                        "session is not activated",
                    ));
                }
                SessionState::Looping => {
                    return Err(Error::capture_loop(
                        id.to_string(),
                        "capture loop is already running",
                    ));
                }
                SessionState::Stopped => return Err(Error::UnknownSession(id)),
            }
        }

        info!(id = %id, device = %session.device, "capture loop started");

        // The loop owns the handle for its whole run; stop() reclaims it
        // after the Stopped state is observed at a poll boundary.
        let mut guard = session.handle.lock();
        let result = loop {
            if session.state() != SessionState::Looping {
                break Ok(());
            }
            let Some(handle) = guard.as_mut() else {
                break Ok(());
            };

            match self.binding.poll(handle) {
                Ok(Some(frame)) => {
                    let packet = frame.into_packet();
                    session.stats.record_packet(packet.len());
                    self.registry.append(id, packet);
                }
                // Timeout tick: re-check the stop signal and poll again
                Ok(None) => continue,
                Err(e) => break Err(e.for_session(id)),
            }
        };
        drop(guard);

        match result {
            Ok(()) => {
                info!(id = %id, packets = session.stats.packets_captured(), "capture loop finished");
                Ok(())
            }
            Err(e) => {
                error!(id = %id, error = %e, "capture loop failed");
                // Unrecoverable: release the device, but keep the session
                // record so already-buffered packets stay drainable until
                // stop() reclaims them.
                *session.state.write() = SessionState::Stopped;
                if let Some(handle) = session.handle.lock().take() {
                    self.binding.close(handle);
                }
                Err(e)
            }
        }
    }

    /// Drain all buffered packets for a session, in capture order.
    ///
    /// The buffer is atomically emptied: a packet is returned by at most
    /// one drain. A session that has captured nothing yields an empty
    /// vector. Draining a stopped identity fails with the unknown-session
    /// condition.
    pub fn drain(&self, id: SessionId) -> Result<Vec<CapturedPacket>> {
        self.session(id)?;
        Ok(self.registry.drain(id))
    }

    /// Stop a session: break its capture loop (if one is running), release
    /// the device handle, and discard its buffer.
    ///
    /// Safe to call at any point of the lifecycle and idempotent; stopping
    /// an unknown or already-stopped identity is a no-op. After `stop`
    /// returns, the identity is invalid for all other operations.
    pub fn stop(&self, id: SessionId) {
        let Some((_, session)) = self.sessions.remove(&id) else {
            debug!(id = %id, "stop on unknown or already stopped session");
            return;
        };

        *session.state.write() = SessionState::Stopped;

        // Blocks until a running loop observes the stop at its next poll
        // boundary and releases the handle.
        if let Some(handle) = session.handle.lock().take() {
            self.binding.close(handle);
        }

        self.registry.remove(id);
        info!(id = %id, device = %session.device, "capture session stopped");
    }

    /// Stop every live session
    pub fn stop_all(&self) {
        let ids: Vec<SessionId> = self.sessions.iter().map(|entry| *entry.key()).collect();
        if !ids.is_empty() {
            info!(count = ids.len(), "stopping all capture sessions");
        }
        for id in ids {
            self.stop(id);
        }
    }

    /// Current lifecycle state of a session
    pub fn state(&self, id: SessionId) -> Result<SessionState> {
        Ok(self.session(id)?.state())
    }

    /// Capture statistics for a session
    pub fn stats(&self, id: SessionId) -> Result<SessionStats> {
        Ok(self.session(id)?.stats.snapshot())
    }

    /// Packets currently buffered for a session (zero for unknown ids)
    pub fn buffered_count(&self, id: SessionId) -> usize {
        self.registry.buffered_count(id)
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Snapshots of all live sessions
    pub fn list_sessions(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .map(|entry| {
                let session = entry.value();
                SessionInfo {
                    id: *entry.key(),
                    device: session.device.clone(),
                    filter: session.filter.clone(),
                    state: session.state(),
                    created_at: session.created_at,
                    stats: session.stats.snapshot(),
                    buffered: self.registry.buffered_count(*entry.key()),
                }
            })
            .collect()
    }

    fn session(&self, id: SessionId) -> Result<Arc<Session<B::Handle>>> {
        self.sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::UnknownSession(id))
    }
}

impl<B: CaptureBinding> Drop for SessionManager<B> {
    fn drop(&mut self) {
        if !self.sessions.is_empty() {
            warn!(
                count = self.sessions.len(),
                "session manager dropped with live sessions"
            );
            self.stop_all();
        }
    }
}
