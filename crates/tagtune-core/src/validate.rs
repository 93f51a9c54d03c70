//! Target URL safety checks.
//!
//! Rejects anything that isn't a plain `http`/`https` URL pointing at a
//! public host. This is a string-level check on the host as written: it
//! doesn't resolve DNS, so a public name that resolves to a private address
//! still gets through.

use std::net::{Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::{Error, Result};

const INVALID_URL: &str = "Invalid URL";
const UNSUPPORTED_SCHEME: &str = "Only http and https URLs are allowed";
const BLOCKED_HOST: &str = "URLs pointing to local or private networks are not allowed";

/// Validate a caller-supplied target and return it parsed and canonicalized.
///
/// Never performs network I/O.
pub fn validate_target(candidate: &str) -> Result<Url> {
    let url = Url::parse(candidate.trim()).map_err(|_| Error::validation(INVALID_URL))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::validation(UNSUPPORTED_SCHEME));
    }

    match url.host() {
        None => Err(Error::validation(INVALID_URL)),
        Some(host) if is_blocked_host(&host) => Err(Error::validation(BLOCKED_HOST)),
        Some(_) => Ok(url),
    }
}

fn is_blocked_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.').to_ascii_lowercase();
            name == "localhost" || name.ends_with(".localhost")
        }
        Host::Ipv4(addr) => is_blocked_ipv4(*addr),
        Host::Ipv6(addr) => is_blocked_ipv6(*addr),
    }
}

fn is_blocked_ipv4(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    a == 0
        || a == 10
        || a == 127
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
        || (a == 169 && b == 254)
}

fn is_blocked_ipv6(addr: Ipv6Addr) -> bool {
    if let Some(mapped) = addr.to_ipv4_mapped() {
        return is_blocked_ipv4(mapped);
    }

    let first = addr.segments()[0];
    addr.is_loopback()
        || addr.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link local
        || (first & 0xffc0) == 0xfe80
}
