//! Per-session capture statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Snapshot of one session's capture statistics
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Frames delivered to the session buffer
    pub packets_captured: u64,
    /// Captured bytes delivered to the session buffer
    pub bytes_captured: u64,
    /// Time since the session was created
    pub duration: Duration,
    /// Average capture rate
    pub packets_per_second: f64,
}

impl SessionStats {
    /// Format statistics as a human-readable string
    pub fn format(&self) -> String {
        format!(
            "Captured: {} packets ({} bytes) in {:.2}s ({:.2} pps)",
            self.packets_captured,
            self.bytes_captured,
            self.duration.as_secs_f64(),
            self.packets_per_second
        )
    }
}

/// Thread-safe statistics counters updated by the capture loop
#[derive(Debug)]
pub struct StatsAccumulator {
    packets: AtomicU64,
    bytes: AtomicU64,
    start_time: Instant,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self {
            packets: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one captured frame
    pub fn record_packet(&self, size: usize) {
        self.packets.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size as u64, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> SessionStats {
        let packets_captured = self.packets.load(Ordering::Relaxed);
        let bytes_captured = self.bytes.load(Ordering::Relaxed);
        let duration = self.start_time.elapsed();

        let secs = duration.as_secs_f64();
        let packets_per_second = if secs > 0.0 {
            packets_captured as f64 / secs
        } else {
            0.0
        };

        SessionStats {
            packets_captured,
            bytes_captured,
            duration,
            packets_per_second,
        }
    }

    /// Get packets captured count
    pub fn packets_captured(&self) -> u64 {
        self.packets.load(Ordering::Relaxed)
    }

    /// Get bytes captured count
    pub fn bytes_captured(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
