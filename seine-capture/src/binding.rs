//! The contract required from the device-level capture binding
//!
//! The session engine does not talk to a capture library directly; it goes
//! through [`CaptureBinding`], which models the handful of primitives the
//! engine needs: open a device handle, configure it, attach a filter,
//! activate it, and poll it for frames. The production implementation is
//! [`crate::libpcap::PcapBinding`]; tests inject stubs.

use seine_core::{CapturedPacket, Result};

/// Default snapshot length: the maximum libpcap supports, so frames are
/// not truncated under normal link MTUs
pub const MAX_SNAPLEN: i32 = 65535;

/// Default poll timeout (milliseconds). This bounds how long a `stop`
/// signal can go unobserved by a running capture loop.
pub const DEFAULT_TIMEOUT_MS: i32 = 1000;

/// Configuration for a capture session
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Maximum bytes to capture per frame
    pub snaplen: i32,
    /// Poll timeout in milliseconds
    pub timeout_ms: i32,
    /// Enable promiscuous mode
    pub promiscuous: bool,
    /// Enable immediate mode (deliver frames as they arrive)
    pub immediate_mode: bool,
    /// Kernel buffer size (0 = binding default)
    pub buffer_size: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            snaplen: MAX_SNAPLEN,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            promiscuous: false,
            immediate_mode: true,
            buffer_size: 0,
        }
    }
}

/// One raw frame as delivered by the binding
#[derive(Debug, Clone)]
pub struct Frame {
    /// Number of bytes the binding captured
    pub caplen: u32,
    /// Length of the frame on the wire (may exceed `caplen`)
    pub wire_len: u32,
    /// Captured bytes
    pub data: Vec<u8>,
}

impl Frame {
    /// Build the buffered packet representation: the captured length and
    /// the first `caplen` bytes.
    pub fn into_packet(self) -> CapturedPacket {
        CapturedPacket::new(self.caplen as usize, self.data)
    }
}

/// Device-level capture primitives the session engine requires.
///
/// A handle returned by [`open`](CaptureBinding::open) is owned exclusively
/// by one session until the engine closes it. All methods surface failures
/// as the typed errors of [`seine_core::Error`], carrying the binding's
/// diagnostic text.
pub trait CaptureBinding: Send + Sync + 'static {
    /// Opaque per-session capture handle
    type Handle: Send + 'static;

    /// Open a capture handle on the named device
    fn open(&self, device: &str, config: &CaptureConfig) -> Result<Self::Handle>;

    /// Set the maximum number of bytes captured per frame
    fn set_snaplen(&self, handle: &mut Self::Handle, snaplen: i32) -> Result<()>;

    /// Compile the filter expression and attach it to the handle
    fn install_filter(&self, handle: &mut Self::Handle, filter: &str) -> Result<()>;

    /// Transition the handle into the capturing state
    fn activate(&self, handle: &mut Self::Handle) -> Result<()>;

    /// Block until the next frame arrives or the poll timeout elapses.
    ///
    /// `Ok(None)` is a timeout tick; the caller re-checks its stop signal
    /// and polls again. `Err` is an unrecoverable capture failure.
    fn poll(&self, handle: &mut Self::Handle) -> Result<Option<Frame>>;

    /// Release the handle and its device
    fn close(&self, handle: Self::Handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CaptureConfig::default();
        assert_eq!(config.snaplen, MAX_SNAPLEN);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!config.promiscuous);
        assert!(config.immediate_mode);
        assert_eq!(config.buffer_size, 0);
    }

    #[test]
    fn test_frame_into_packet_truncates() {
        let frame = Frame {
            caplen: 3,
            wire_len: 64,
            data: vec![1, 2, 3, 4, 5],
        };
        let packet = frame.into_packet();
        assert_eq!(packet.len(), 3);
        assert_eq!(packet.data(), &[1, 2, 3]);
    }
}
