//! Shareable URL construction.
//!
//! A fork or save response includes the full public URL for the new
//! design so the studio can surface a copy-to-clipboard link. The base is
//! derived from the incoming request rather than configuration alone, so
//! links match whatever host the visitor actually reached us on (custom
//! domains, preview deploys).

use inkwell_core::ShareId;

/// Derive the base URL for share links from request headers.
///
/// Preference order:
/// 1. `Origin` header, when it carries a full scheme://host origin.
/// 2. `Host` header with an assumed `https` scheme.
/// 3. The configured public base URL.
#[must_use]
pub fn share_base_url(origin: Option<&str>, host: Option<&str>, fallback: &str) -> String {
    if let Some(origin) = origin {
        // Browsers send "null" for opaque origins; ignore it.
        if !origin.is_empty() && origin != "null" && origin.contains("://") {
            return origin.trim_end_matches('/').to_owned();
        }
    }

    if let Some(host) = host
        && !host.is_empty()
    {
        return format!("https://{host}");
    }

    fallback.trim_end_matches('/').to_owned()
}

/// Build the public share URL for a design.
#[must_use]
pub fn share_url(base_url: &str, share_id: &ShareId) -> String {
    format!("{}/designs/share/{share_id}", base_url.trim_end_matches('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_origin() {
        let base = share_base_url(
            Some("https://shop.inkwellpress.example"),
            Some("internal:3000"),
            "https://fallback.example",
        );
        assert_eq!(base, "https://shop.inkwellpress.example");
    }

    #[test]
    fn test_opaque_origin_falls_through_to_host() {
        let base = share_base_url(Some("null"), Some("shop.example"), "https://fallback.example");
        assert_eq!(base, "https://shop.example");
    }

    #[test]
    fn test_host_gets_assumed_scheme() {
        let base = share_base_url(None, Some("shop.example:8443"), "https://fallback.example");
        assert_eq!(base, "https://shop.example:8443");
    }

    #[test]
    fn test_falls_back_to_configured_base() {
        let base = share_base_url(None, None, "https://fallback.example/");
        assert_eq!(base, "https://fallback.example");
    }

    #[test]
    fn test_share_url() {
        let id = ShareId::parse("a1b2c3d4").unwrap();
        assert_eq!(
            share_url("https://shop.example/", &id),
            "https://shop.example/designs/share/a1b2c3d4"
        );
    }
}
