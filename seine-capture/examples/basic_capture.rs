//! Example: Basic packet capture
//!
//! Opens a capture session on the default interface and drains buffered
//! packets while the capture loop runs on a background thread.
//! Note: Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example basic_capture

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use seine_capture::{default_interface, CaptureConfig, SessionManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Find default interface
    let iface = default_interface()?;
    println!("Capturing on: {} ({})", iface.name, iface.description);

    let manager = Arc::new(SessionManager::pcap(CaptureConfig::default()));

    // Open and activate a session with no filter
    let id = manager.create(&iface.name, "")?;
    manager.activate(id)?;

    println!("Starting packet capture... (10 seconds or 20 packets)");
    println!();

    // The capture loop blocks, so it gets its own thread
    let runner = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || manager.run(id))
    };

    // Drain the session buffer while the loop captures
    let mut total = 0usize;
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(10) && total < 20 {
        thread::sleep(Duration::from_millis(500));

        for packet in manager.drain(id)? {
            total += 1;
            println!("[{}] Packet: {} bytes", total, packet.len());
        }
    }

    // Print final statistics before the session goes away
    let stats = manager.stats(id)?;

    // Stop the session; the loop observes it and returns
    manager.stop(id);
    runner.join().expect("capture thread panicked")?;

    println!("\n=== Final Statistics ===");
    println!("{}", stats.format());

    Ok(())
}
