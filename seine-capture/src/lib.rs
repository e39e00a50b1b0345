//! Live packet capture sessions for seine
//!
//! This crate turns the callback-driven capture stream of a packet capture
//! binding into safe, poll-able per-session packet queues.
//!
//! ## Features
//!
//! - **Session Lifecycle**: create, activate, run, drain and stop capture
//!   sessions addressed by opaque identities
//! - **Per-Session Buffering**: captured frames accumulate in a keyed
//!   registry until the caller drains them
//! - **Pluggable Binding**: the device-level capture mechanics live behind
//!   a trait; libpcap is the production implementation
//! - **Interface Management**: list, query, and select network interfaces
//! - **BPF Filters**: pre-built filter expressions for common traffic
//! - **Thread-Safe**: the capture loop blocks its own thread while drain
//!   and stop are issued from others
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use seine_capture::{CaptureConfig, SessionManager};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Arc::new(SessionManager::pcap(CaptureConfig::default()));
//!
//! // Open a session on eth0 capturing ARP traffic only
//! let id = manager.create("eth0", "arp")?;
//! manager.activate(id)?;
//!
//! // The capture loop blocks, so give it its own thread
//! let runner = {
//!     let manager = Arc::clone(&manager);
//!     std::thread::spawn(move || manager.run(id))
//! };
//!
//! // Pull whatever has been captured so far
//! for packet in manager.drain(id)? {
//!     println!("captured {} bytes", packet.len());
//! }
//!
//! // Break the loop and release the device
//! manager.stop(id);
//! runner.join().unwrap()?;
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod filters;
pub mod interface;
pub mod libpcap;
pub mod manager;
pub mod registry;
pub mod session;
pub mod stats;

// Re-export main types
pub use binding::{CaptureBinding, CaptureConfig, Frame};
pub use interface::{
    default_interface, get_interface, list_capture_interfaces, list_interfaces, InterfaceInfo,
};
pub use libpcap::PcapBinding;
pub use manager::{PcapSessionManager, SessionInfo, SessionManager};
pub use registry::PacketRegistry;
pub use session::SessionState;
pub use stats::{SessionStats, StatsAccumulator};
