//! Per-session packet buffering
//!
//! The registry is the single shared resource between a running capture
//! loop and the caller draining packets: a keyed store of append-only
//! buffers, one per session identity. Buffers are created lazily on first
//! append and removed when their session stops; an identity the registry
//! has never seen simply has zero packets.

use dashmap::DashMap;
use tracing::{debug, trace};

use seine_core::{CapturedPacket, SessionId};

/// Keyed store of not-yet-delivered packets, one buffer per session.
///
/// `append` and `drain` may be called concurrently from different threads;
/// the map's per-shard locking makes each of them atomic, so every packet
/// appended before a drain takes its buffer is either in that drain's
/// result or deferred intact to the next one, never split or duplicated.
#[derive(Debug, Default)]
pub struct PacketRegistry {
    buffers: DashMap<SessionId, Vec<CapturedPacket>>,
}

impl PacketRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            buffers: DashMap::new(),
        }
    }

    /// Append a packet to the tail of the buffer for `id`, creating the
    /// buffer first if none exists. Preserves capture order.
    pub fn append(&self, id: SessionId, packet: CapturedPacket) {
        trace!(id = %id, len = packet.len(), "buffering captured packet");
        self.buffers.entry(id).or_default().push(packet);
    }

    /// Atomically take all buffered packets for `id`, in capture order.
    ///
    /// The buffer is emptied: a packet is returned by at most one drain.
    /// An identity with no buffer yields an empty vector, never an error.
    pub fn drain(&self, id: SessionId) -> Vec<CapturedPacket> {
        let packets = self
            .buffers
            .remove(&id)
            .map(|(_, buffer)| buffer)
            .unwrap_or_default();
        debug!(id = %id, count = packets.len(), "drained session buffer");
        packets
    }

    /// Number of packets currently buffered for `id`
    pub fn buffered_count(&self, id: SessionId) -> usize {
        self.buffers.get(&id).map(|buffer| buffer.len()).unwrap_or(0)
    }

    /// Drop the buffer for `id`, discarding anything still queued
    pub fn remove(&self, id: SessionId) {
        if let Some((_, buffer)) = self.buffers.remove(&id) {
            if !buffer.is_empty() {
                debug!(id = %id, count = buffer.len(), "discarding undrained packets");
            }
        }
    }

    /// Number of sessions with a live buffer
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Check whether any session has a live buffer
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn packet(payload: &[u8]) -> CapturedPacket {
        CapturedPacket::new(payload.len(), payload.to_vec())
    }

    #[test]
    fn test_drain_returns_append_order() {
        let registry = PacketRegistry::new();
        let id = SessionId::new();

        registry.append(id, packet(&[1]));
        registry.append(id, packet(&[2, 2]));
        registry.append(id, packet(&[3, 3, 3]));

        let drained = registry.drain(id);
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0].data(), &[1]);
        assert_eq!(drained[1].data(), &[2, 2]);
        assert_eq!(drained[2].data(), &[3, 3, 3]);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let registry = PacketRegistry::new();
        let id = SessionId::new();

        registry.append(id, packet(&[42]));
        assert_eq!(registry.drain(id).len(), 1);
        assert!(registry.drain(id).is_empty());
    }

    #[test]
    fn test_drain_unknown_identity() {
        let registry = PacketRegistry::new();
        assert!(registry.drain(SessionId::new()).is_empty());
    }

    #[test]
    fn test_buffers_are_isolated_per_session() {
        let registry = PacketRegistry::new();
        let a = SessionId::new();
        let b = SessionId::new();

        registry.append(a, packet(&[0xaa]));
        registry.append(b, packet(&[0xbb]));

        let drained = registry.drain(a);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].data(), &[0xaa]);
        assert_eq!(registry.buffered_count(b), 1);
    }

    #[test]
    fn test_buffered_count() {
        let registry = PacketRegistry::new();
        let id = SessionId::new();

        assert_eq!(registry.buffered_count(id), 0);
        registry.append(id, packet(&[1]));
        registry.append(id, packet(&[2]));
        assert_eq!(registry.buffered_count(id), 2);
    }

    #[test]
    fn test_remove_discards_queued_packets() {
        let registry = PacketRegistry::new();
        let id = SessionId::new();

        registry.append(id, packet(&[1]));
        registry.remove(id);
        assert!(registry.drain(id).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_append_and_drain_lose_nothing() {
        const TOTAL: u32 = 2000;

        let registry = Arc::new(PacketRegistry::new());
        let id = SessionId::new();

        let appender = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for seq in 0..TOTAL {
                    registry.append(id, packet(&seq.to_le_bytes()));
                }
            })
        };

        // Drain concurrently with the appender; collect everything in
        // drain-invocation order.
        let mut collected = Vec::new();
        while collected.len() < TOTAL as usize {
            collected.extend(registry.drain(id));
            if appender.is_finished() && registry.buffered_count(id) == 0 {
                collected.extend(registry.drain(id));
                break;
            }
        }
        appender.join().unwrap();
        collected.extend(registry.drain(id));

        // The union of all drains equals the append sequence, in order.
        assert_eq!(collected.len(), TOTAL as usize);
        for (seq, pkt) in collected.iter().enumerate() {
            let expected = (seq as u32).to_le_bytes();
            assert_eq!(pkt.data(), &expected);
        }
    }
}
