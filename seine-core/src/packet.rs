//! Captured packet types

/// One captured link-layer frame.
///
/// Holds the frame's captured byte sequence plus its captured length. The
/// captured length may be less than the on-wire frame length when the
/// configured capture size truncated the frame. Packets are immutable once
/// captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPacket {
    /// Number of bytes actually captured
    caplen: usize,
    /// Captured bytes (exactly `caplen` of them)
    data: Vec<u8>,
}

impl CapturedPacket {
    /// Build a packet from a captured length and the delivered bytes.
    ///
    /// Only the first `caplen` bytes of `data` are kept.
    pub fn new(caplen: usize, mut data: Vec<u8>) -> Self {
        data.truncate(caplen);
        Self {
            caplen: data.len(),
            data,
        }
    }

    /// Get packet data as slice
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the captured length
    pub fn len(&self) -> usize {
        self.caplen
    }

    /// Check if packet is empty
    pub fn is_empty(&self) -> bool {
        self.caplen == 0
    }

    /// Consume the packet, yielding its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_caplen_bytes() {
        let packet = CapturedPacket::new(4, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(packet.len(), 4);
        assert_eq!(packet.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_new_with_short_delivery() {
        // Binding delivered fewer bytes than the claimed capture length;
        // the packet reports what it actually holds.
        let packet = CapturedPacket::new(10, vec![1, 2, 3]);
        assert_eq!(packet.len(), 3);
        assert_eq!(packet.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_empty_packet() {
        let packet = CapturedPacket::new(0, Vec::new());
        assert!(packet.is_empty());
        assert_eq!(packet.len(), 0);
    }

    #[test]
    fn test_into_bytes() {
        let packet = CapturedPacket::new(2, vec![0xde, 0xad, 0xbe]);
        assert_eq!(packet.into_bytes(), vec![0xde, 0xad]);
    }
}
