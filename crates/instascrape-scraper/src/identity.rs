//! Browser identity rotation for anti-detection.
//!
//! Each outbound request carries a randomly drawn realistic browser
//! identity (user-agent plus a matching header set) so a batch never
//! presents a single fixed fingerprint to the target.

use rand::prelude::IndexedRandom;

/// One realistic desktop browser fingerprint.
#[derive(Debug, Clone, Copy)]
pub struct BrowserIdentity {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

/// Pool of current desktop browser identities the rotation draws from.
const IDENTITY_POOL: &[BrowserIdentity] = &[
    BrowserIdentity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        accept_language: "en-US,en;q=0.9",
    },
    BrowserIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        accept_language: "en-US,en;q=0.9,es;q=0.8",
    },
    BrowserIdentity {
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        accept_language: "en-US,en;q=0.9",
    },
    BrowserIdentity {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:125.0) Gecko/20100101 Firefox/125.0",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
        accept_language: "en-US,en;q=0.5",
    },
    BrowserIdentity {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        accept_language: "en-US,en;q=0.5",
    },
];

/// Draw a random identity from the pool.
#[must_use]
pub fn random_identity() -> BrowserIdentity {
    let mut rng = rand::rng();
    *IDENTITY_POOL.choose(&mut rng).expect("non-empty pool")
}

/// Navigation-style headers resembling a browser page load, paired with
/// the given identity.
#[must_use]
pub fn document_headers(identity: &BrowserIdentity) -> Vec<(&'static str, String)> {
    vec![
        ("User-Agent", identity.user_agent.to_string()),
        ("Accept", identity.accept.to_string()),
        ("Accept-Language", identity.accept_language.to_string()),
        ("Upgrade-Insecure-Requests", "1".to_string()),
        ("Sec-Fetch-Dest", "document".to_string()),
        ("Sec-Fetch-Mode", "navigate".to_string()),
        ("Sec-Fetch-Site", "none".to_string()),
        ("Sec-Fetch-User", "?1".to_string()),
        ("Cache-Control", "no-cache".to_string()),
        ("Pragma", "no-cache".to_string()),
        ("DNT", "1".to_string()),
        ("Referer", "https://www.google.com/".to_string()),
    ]
}

/// XHR-style headers resembling the target's own web client calling its
/// JSON endpoints.
#[must_use]
pub fn xhr_headers(identity: &BrowserIdentity, origin: &str) -> Vec<(&'static str, String)> {
    vec![
        ("User-Agent", identity.user_agent.to_string()),
        ("Accept", "*/*".to_string()),
        ("Accept-Language", identity.accept_language.to_string()),
        ("X-Requested-With", "XMLHttpRequest".to_string()),
        // App id the target's own web client sends on JSON requests.
        ("X-IG-App-ID", "936619743392459".to_string()),
        ("X-IG-WWW-Claim", "0".to_string()),
        ("Sec-Fetch-Dest", "empty".to_string()),
        ("Sec-Fetch-Mode", "cors".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("Referer", format!("{origin}/")),
        ("Origin", origin.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_multiple_identities() {
        assert!(
            IDENTITY_POOL.len() >= 3,
            "rotation requires more than one fingerprint"
        );
    }

    #[test]
    fn document_headers_carry_identity_user_agent() {
        let identity = IDENTITY_POOL[0];
        let headers = document_headers(&identity);
        let ua = headers
            .iter()
            .find(|(name, _)| *name == "User-Agent")
            .map(|(_, v)| v.as_str());
        assert_eq!(ua, Some(identity.user_agent));
    }

    #[test]
    fn xhr_headers_scope_referer_to_origin() {
        let identity = IDENTITY_POOL[0];
        let headers = xhr_headers(&identity, "http://127.0.0.1:9999");
        let referer = headers
            .iter()
            .find(|(name, _)| *name == "Referer")
            .map(|(_, v)| v.as_str());
        assert_eq!(referer, Some("http://127.0.0.1:9999/"));
    }

    #[test]
    fn random_identity_is_from_pool() {
        let identity = random_identity();
        assert!(IDENTITY_POOL
            .iter()
            .any(|candidate| candidate.user_agent == identity.user_agent));
    }
}
