//! Origin allow-list for the relay.
//!
//! Browsers send the `Origin` header as `scheme://host[:port]` with no
//! path, so the policy compares parsed hostnames instead of whole-string
//! equality. A configured value that accidentally carries a path or a
//! trailing slash still matches the host it names.

/// Decides which request origins may reach the lead endpoint.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    production_host: String,
    preview_suffix: String,
}

impl OriginPolicy {
    /// `production_host` is matched exactly; `preview_suffix` admits any
    /// `*.<suffix>` host (deploy previews). Loopback hosts are always
    /// allowed on any port for local development.
    pub fn new(production_host: impl Into<String>, preview_suffix: impl Into<String>) -> Self {
        OriginPolicy {
            production_host: host_of(&production_host.into())
                .unwrap_or_default()
                .to_ascii_lowercase(),
            preview_suffix: preview_suffix.into().to_ascii_lowercase(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        let Some(host) = host_of(origin) else {
            return false;
        };
        let host = host.to_ascii_lowercase();
        if is_loopback(&host) {
            return true;
        }
        if !self.production_host.is_empty() && host == self.production_host {
            return true;
        }
        !self.preview_suffix.is_empty() && host.ends_with(&format!(".{}", self.preview_suffix))
    }

    /// CORS headers to attach when the origin is allowed; `None` means
    /// the response carries no CORS headers at all.
    pub fn cors_headers(&self, origin: &str) -> Option<Vec<(String, String)>> {
        if !self.allows(origin) {
            return None;
        }
        Some(vec![
            ("Access-Control-Allow-Origin".into(), origin.to_string()),
            ("Access-Control-Allow-Methods".into(), "GET, POST, OPTIONS".into()),
            ("Access-Control-Allow-Headers".into(), "Content-Type".into()),
        ])
    }
}

/// Extract the hostname from `scheme://host[:port][/path]`. Accepts a
/// bare `host[:port]` too, tolerates trailing paths, and unwraps IPv6
/// bracket notation.
fn host_of(origin: &str) -> Option<&str> {
    let rest = match origin.find("://") {
        Some(idx) => &origin[idx + 3..],
        None => origin,
    };
    let authority = rest.split('/').next().unwrap_or("");
    if authority.is_empty() {
        return None;
    }
    if let Some(bracketed) = authority.strip_prefix('[') {
        return bracketed.split(']').next().filter(|h| !h.is_empty());
    }
    // Strip a numeric port; a colon followed by non-digits is malformed.
    match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
            Some(host)
        }
        Some(_) => None,
        None => Some(authority),
    }
}

fn is_loopback(host: &str) -> bool {
    host == "localhost" || host == "127.0.0.1" || host == "::1"
}
