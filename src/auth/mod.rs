pub mod jwt;
pub mod middleware;
pub mod password;

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Extract the client IP address from request headers.
///
/// Checks `X-Forwarded-For` first (first hop wins), then falls back to `X-Real-IP`.
/// Values that do not parse as an IPv4/IPv6 address are ignored.
#[must_use]
pub fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.0.0.100, 172.16.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.1"));
        assert_eq!(
            extract_client_ip(&headers),
            Some(IpAddr::from([10, 0, 0, 100]))
        );
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("192.168.1.100"));
        assert_eq!(
            extract_client_ip(&headers),
            Some(IpAddr::from([192, 168, 1, 100]))
        );
    }

    #[test]
    fn test_garbage_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        assert_eq!(extract_client_ip(&headers), None);
    }
}
