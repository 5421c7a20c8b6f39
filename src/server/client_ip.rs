//! Per-request client IP determination.
//!
//! Trust order: `X-Real-IP`, then the entries of `X-Forwarded-For`, then the
//! socket peer address. Both headers are client-controllable, so this is only
//! meaningful behind a reverse proxy that overwrites them. When the winning
//! address is private or loopback (typical for local deployments), the
//! service asks ifconfig.me what its public address is, since a geolocation
//! lookup on a private address cannot succeed.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderMap;

use crate::pipeline::ProviderError;

const PROVIDER: &str = "ifconfig.me";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Pick the client IP for a request. Header entries that do not parse fall
/// through; the peer address is the final word.
pub fn from_request(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    if let Some(ip) = header_ip(headers, "x-real-ip") {
        return ip;
    }

    if let Some(value) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        for entry in value.split(',') {
            if let Ok(ip) = entry.trim().parse() {
                return ip;
            }
        }
    }

    peer.ip()
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// True for addresses a public geolocation service cannot place: loopback,
/// RFC 1918 and link-local IPv4, and non-global IPv6 ranges.
pub fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique-local, fe80::/10 link-local
                || (segments[0] & 0xfe00) == 0xfc00
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Ask ifconfig.me for our public address. One blocking call, no retry.
pub fn lookup_public() -> Result<String, ProviderError> {
    let body = ureq::builder()
        .timeout(TIMEOUT)
        .build()
        .get("http://ifconfig.me")
        .call()
        .map_err(|e| ProviderError::unavailable(PROVIDER, e.to_string()))?
        .into_string()
        .map_err(|e| ProviderError::unavailable(PROVIDER, e.to_string()))?;

    let ip = body.trim();
    if ip.parse::<IpAddr>().is_err() {
        return Err(ProviderError::invalid(
            PROVIDER,
            format!("not an IP address: '{}'", crate::pipeline::types::truncate(ip)),
        ));
    }

    Ok(ip.to_string())
}
