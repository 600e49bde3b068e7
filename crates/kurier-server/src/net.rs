//! Best-effort discovery of a LAN-reachable address, logged at startup so
//! the operator knows where to point a browser or a device on the network.

use std::net::{IpAddr, UdpSocket};

use tracing::{info, warn};

/// Figure out which local address other machines on the network can reach.
///
/// Binds an unconnected UDP socket and "connects" it to a public address;
/// the OS picks the preferred outbound interface and we read its IP back.
/// No packet is ever transmitted.
pub fn host_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip())
}

/// Log the address the command API is reachable at from the local network.
pub fn log_host_address(port: u16) {
    match host_address() {
        Some(ip) => info!(
            address = %ip,
            port,
            "Open http://{ip}:{port}/ in your favorite browser"
        ),
        None => warn!(port, "Could not determine a LAN address, use the bind address"),
    }
}
