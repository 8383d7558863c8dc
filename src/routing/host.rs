//! Host header parsing.
//!
//! # Responsibilities
//! - Normalize the raw header (case, port, trailing dot)
//! - Distinguish DNS names from IP literals
//! - Detect local development hosts
//! - Extract the leading subdomain label given a bare-domain threshold
//!
//! # Design Decisions
//! - Anything that does not look like a host is rejected as `None`
//! - IP literals never carry a subdomain

use std::net::{IpAddr, Ipv6Addr};

/// A syntactically valid, normalized request host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    /// Lowercase DNS name without port or trailing dot.
    Name(String),
    /// IPv4 or IPv6 literal.
    Ip(IpAddr),
}

impl Host {
    /// Parse a `Host` header value (or URI authority).
    /// Returns `None` for empty or malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(rest) = raw.strip_prefix('[') {
            let (addr, after) = rest.split_once(']')?;
            if !after.is_empty() && !is_port_suffix(after) {
                return None;
            }
            return addr.parse::<Ipv6Addr>().ok().map(|ip| Host::Ip(IpAddr::V6(ip)));
        }

        let name = match raw.rsplit_once(':') {
            Some((name, port)) if is_port(port) => name,
            Some(_) => return None,
            None => raw,
        };
        let name = name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase();

        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return None;
        }

        match name.parse::<IpAddr>() {
            Ok(ip) => Some(Host::Ip(ip)),
            Err(_) => Some(Host::Name(name)),
        }
    }

    /// Loopback names and addresses used during local development.
    pub fn is_local(&self) -> bool {
        match self {
            Host::Name(name) => name == "localhost" || name.ends_with(".localhost"),
            Host::Ip(ip) => ip.is_loopback(),
        }
    }

    /// The leading label when the host has strictly more labels than the
    /// bare domain. Hosts with empty labels (`a..b`) and IP literals have none.
    pub fn subdomain_label(&self, bare_domain_label_count: usize) -> Option<&str> {
        let Host::Name(name) = self else {
            return None;
        };

        let mut labels = name.split('.');
        let first = labels.next()?;
        let mut count = 1;
        for label in labels {
            if label.is_empty() {
                return None;
            }
            count += 1;
        }

        (!first.is_empty() && count > bare_domain_label_count).then_some(first)
    }
}

fn is_port(s: &str) -> bool {
    !s.is_empty() && s.len() <= 5 && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_port_suffix(s: &str) -> bool {
    s.strip_prefix(':').is_some_and(is_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(
            Host::parse(" Panel.QRMenu.app:443 "),
            Some(Host::Name("panel.qrmenu.app".into()))
        );
        assert_eq!(
            Host::parse("qrmenu.app."),
            Some(Host::Name("qrmenu.app".into()))
        );
        assert_eq!(
            Host::parse("127.0.0.1:3000"),
            Some(Host::Ip("127.0.0.1".parse().unwrap()))
        );
        assert_eq!(
            Host::parse("[::1]:3000"),
            Some(Host::Ip("::1".parse().unwrap()))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Host::parse(""), None);
        assert_eq!(Host::parse("   "), None);
        assert_eq!(Host::parse("qrmenu.app:port"), None);
        assert_eq!(Host::parse("bad host.app"), None);
        assert_eq!(Host::parse("[::1"), None);
        assert_eq!(Host::parse("[::1]junk"), None);
        assert_eq!(Host::parse(":3000"), None);
    }

    #[test]
    fn test_is_local() {
        assert!(Host::parse("localhost:3000").unwrap().is_local());
        assert!(Host::parse("panel.localhost").unwrap().is_local());
        assert!(Host::parse("127.0.0.1").unwrap().is_local());
        assert!(Host::parse("[::1]:8080").unwrap().is_local());
        assert!(!Host::parse("qrmenu.app").unwrap().is_local());
        assert!(!Host::parse("10.0.0.5").unwrap().is_local());
        assert!(!Host::parse("notlocalhost.app").unwrap().is_local());
    }

    #[test]
    fn test_subdomain_label_threshold() {
        let host = Host::parse("panel.qrmenu.app").unwrap();
        assert_eq!(host.subdomain_label(2), Some("panel"));
        assert_eq!(host.subdomain_label(3), None);

        let bare = Host::parse("qrmenu.app").unwrap();
        assert_eq!(bare.subdomain_label(2), None);

        let preview = Host::parse("bellavista.qr-menu-saas-sepia.vercel.app").unwrap();
        assert_eq!(preview.subdomain_label(3), Some("bellavista"));
        assert_eq!(
            Host::parse("qr-menu-saas-sepia.vercel.app")
                .unwrap()
                .subdomain_label(3),
            None
        );
    }

    #[test]
    fn test_subdomain_label_edge_cases() {
        assert_eq!(Host::parse("a..qrmenu.app").unwrap().subdomain_label(2), None);
        assert_eq!(Host::parse(".qrmenu.app").unwrap().subdomain_label(2), None);
        assert_eq!(Host::parse("10.0.0.5").unwrap().subdomain_label(2), None);
        assert_eq!(
            Host::parse("a.b.qrmenu.app").unwrap().subdomain_label(2),
            Some("a")
        );
    }
}
