//! Service-name to UDP port lookup over an `/etc/services` style file

use std::fs;
use std::path::Path;
use tracing::debug;

/// Default services database
pub const DEFAULT_SERVICES_FILE: &str = "/etc/services";

/// UDP port registered for `name` (or one of its aliases) in `path`.
///
/// An unreadable file counts as "not found".
pub fn lookup_udp_port(name: &str, path: &Path) -> Option<u16> {
    match fs::read_to_string(path) {
        Ok(content) => find_udp_port(name, &content),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Services database unavailable");
            None
        }
    }
}

/// Scan services text for the UDP port of `name`
pub fn find_udp_port(name: &str, content: &str) -> Option<u16> {
    content.lines().find_map(|line| {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let service = fields.next()?;
        let (port, proto) = fields.next()?.split_once('/')?;
        if proto != "udp" {
            return None;
        }
        let mut names = std::iter::once(service).chain(fields);
        if names.any(|n| n == name) {
            port.parse().ok()
        } else {
            None
        }
    })
}
