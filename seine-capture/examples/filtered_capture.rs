//! Example: Filtered packet capture
//!
//! Demonstrates using BPF filters to capture specific traffic.
//! Note: Requires root/administrator privileges to run.
//!
//! Run with: sudo cargo run --example filtered_capture

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use seine_capture::{default_interface, filters, CaptureConfig, SessionManager};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Find default interface
    let iface = default_interface()?;
    println!("Capturing on: {} ({})", iface.name, iface.description);

    // Capture ARP and DHCP traffic only
    let filter = filters::combine_filters_or(&[&filters::arp_filter(), &filters::dhcp_filter()]);
    println!("BPF Filter: {}", filter);
    println!();

    let manager = Arc::new(SessionManager::pcap(CaptureConfig::default()));

    let id = manager.create(&iface.name, &filter)?;
    manager.activate(id)?;

    println!("Capturing ARP and DHCP traffic...");
    println!("Will capture for 30 seconds or 10 packets");
    println!();

    let runner = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || manager.run(id))
    };

    let mut total = 0usize;
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(30) && total < 10 {
        thread::sleep(Duration::from_millis(500));

        for packet in manager.drain(id)? {
            total += 1;
            println!("[{}] Matched packet, {} bytes", total, packet.len());

            // Print first few bytes in hex
            let preview = packet
                .data()
                .iter()
                .take(32)
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ");
            println!("  Data: {}", preview);
            println!();
        }
    }

    manager.stop(id);
    runner.join().expect("capture thread panicked")?;

    println!("\n=== Capture Complete ===");
    println!("Total packets: {}", total);

    Ok(())
}
