//! BPF (Berkeley Packet Filter) expression builders
//!
//! These produce filter expression strings for common traffic selections;
//! compilation and installation stay with the capture binding.

/// ARP filter
pub fn arp_filter() -> String {
    "arp".to_string()
}

/// IPv4 filter
pub fn ipv4_filter() -> String {
    "ip".to_string()
}

/// IPv6 filter
pub fn ipv6_filter() -> String {
    "ip6".to_string()
}

/// TCP filter
pub fn tcp_filter() -> String {
    "tcp".to_string()
}

/// UDP filter
pub fn udp_filter() -> String {
    "udp".to_string()
}

/// ICMP filter
pub fn icmp_filter() -> String {
    "icmp".to_string()
}

/// DHCP filter (both client and server)
/// Captures DHCP traffic on ports 67 and 68
pub fn dhcp_filter() -> String {
    "(udp port 67 or udp port 68)".to_string()
}

/// 802.1Q VLAN tagged packets filter
pub fn vlan_filter() -> String {
    "vlan".to_string()
}

/// Filter for specific source or destination IP
pub fn host_filter(ip: &str) -> String {
    format!("host {}", ip)
}

/// Filter for specific source IP
pub fn src_ip_filter(ip: &str) -> String {
    format!("src host {}", ip)
}

/// Filter for specific destination IP
pub fn dst_ip_filter(ip: &str) -> String {
    format!("dst host {}", ip)
}

/// Filter for specific TCP port (source or destination)
pub fn tcp_port_filter(port: u16) -> String {
    format!("tcp port {}", port)
}

/// Filter for specific UDP port (source or destination)
pub fn udp_port_filter(port: u16) -> String {
    format!("udp port {}", port)
}

/// Filter for broadcast packets
pub fn broadcast_filter() -> String {
    "ether broadcast".to_string()
}

/// Combine multiple filters with AND logic
pub fn combine_filters(filters: &[&str]) -> String {
    if filters.is_empty() {
        return String::new();
    }

    filters
        .iter()
        .map(|f| format!("({})", f))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Combine multiple filters with OR logic
pub fn combine_filters_or(filters: &[&str]) -> String {
    if filters.is_empty() {
        return String::new();
    }

    filters
        .iter()
        .map(|f| format!("({})", f))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Negate a filter
pub fn not_filter(filter: &str) -> String {
    format!("not ({})", filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_filters() {
        assert_eq!(arp_filter(), "arp");
        assert_eq!(tcp_port_filter(443), "tcp port 443");
        assert_eq!(host_filter("10.0.0.1"), "host 10.0.0.1");
    }

    #[test]
    fn test_combine_filters() {
        let combined = combine_filters(&[&tcp_filter(), &host_filter("10.0.0.1")]);
        assert_eq!(combined, "(tcp) and (host 10.0.0.1)");
    }

    #[test]
    fn test_combine_filters_or() {
        let combined = combine_filters_or(&[&arp_filter(), &dhcp_filter()]);
        assert_eq!(combined, "(arp) or ((udp port 67 or udp port 68))");
    }

    #[test]
    fn test_combine_empty() {
        assert_eq!(combine_filters(&[]), "");
        assert_eq!(combine_filters_or(&[]), "");
    }

    #[test]
    fn test_not_filter() {
        assert_eq!(not_filter("tcp port 22"), "not (tcp port 22)");
    }
}
