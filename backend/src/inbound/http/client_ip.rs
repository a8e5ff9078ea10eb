//! Caller address extraction for notifications.
//!
//! Proxies announce the original caller through `Forwarded` or
//! `X-Forwarded-For`; without them the peer socket address is used.

use std::net::{IpAddr, SocketAddr};

use actix_web::dev::ConnectionInfo;

use crate::domain::UNKNOWN;

/// Best-effort caller IP, or `"Unknown"` when none is available.
pub fn caller_ip(info: &ConnectionInfo) -> String {
    info.realip_remote_addr()
        .map(strip_port)
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned())
}

fn strip_port(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(socket) = raw.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }
    if let Ok(ip) = raw.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        return ip.to_string();
    }
    raw.to_owned()
}
