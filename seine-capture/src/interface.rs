//! Network interface enumeration and information

use pnet_datalink::{self, NetworkInterface};
use std::net::IpAddr;

use seine_core::{Error, Result};

/// Information about a network interface
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "eth0", "wlan0")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Kernel interface index
    pub index: u32,
    /// MAC address if available
    pub mac: Option<String>,
    /// List of IP addresses assigned to this interface
    pub ips: Vec<IpAddr>,
    /// Whether the interface is up
    pub is_up: bool,
    /// Whether the interface is a loopback
    pub is_loopback: bool,
}

impl From<&NetworkInterface> for InterfaceInfo {
    fn from(iface: &NetworkInterface) -> Self {
        let mac = iface.mac.map(|mac| {
            format!(
                "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                mac.0, mac.1, mac.2, mac.3, mac.4, mac.5
            )
        });

        let ips: Vec<IpAddr> = iface.ips.iter().map(|network| network.ip()).collect();

        InterfaceInfo {
            name: iface.name.clone(),
            description: iface.description.clone(),
            index: iface.index,
            mac,
            ips,
            is_up: iface.is_up(),
            is_loopback: iface.is_loopback(),
        }
    }
}

impl InterfaceInfo {
    /// Check if the interface is suitable for packet capture
    pub fn is_capture_capable(&self) -> bool {
        self.is_up && !self.is_loopback
    }

    /// Get the primary IPv4 address if available
    pub fn primary_ipv4(&self) -> Option<IpAddr> {
        self.ips
            .iter()
            .find(|ip| matches!(ip, IpAddr::V4(_)))
            .copied()
    }
}

/// List all available network interfaces
pub fn list_interfaces() -> Result<Vec<InterfaceInfo>> {
    let interfaces = pnet_datalink::interfaces();

    if interfaces.is_empty() {
        return Err(Error::Interface(
            "no network interfaces found; are you running with sufficient privileges?".to_string(),
        ));
    }

    Ok(interfaces.iter().map(InterfaceInfo::from).collect())
}

/// Get information about a specific interface by name
pub fn get_interface(name: &str) -> Result<InterfaceInfo> {
    let interfaces = pnet_datalink::interfaces();

    interfaces
        .iter()
        .find(|iface| iface.name == name)
        .map(InterfaceInfo::from)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))
}

/// Find the default interface (first non-loopback, up interface)
pub fn default_interface() -> Result<InterfaceInfo> {
    let interfaces = list_interfaces()?;

    interfaces
        .into_iter()
        .find(|iface| iface.is_capture_capable())
        .ok_or_else(|| Error::Interface("no suitable default interface found".to_string()))
}

/// List all interfaces suitable for packet capture
pub fn list_capture_interfaces() -> Result<Vec<InterfaceInfo>> {
    let interfaces = list_interfaces()?;
    Ok(interfaces
        .into_iter()
        .filter(|iface| iface.is_capture_capable())
        .collect())
}
