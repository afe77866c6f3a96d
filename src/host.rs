//! Hostname grammar for SMB URIs.
//!
//! # Grammar Reference
//!
//! ```abnf
//! host          = "[" IPv6address "]" / IPv4address / hostname / netbios-name
//! hostname      = *( domainlabel "." ) toplabel [ "." ]
//! domainlabel   = alphanum / alphanum *( alphanum / "-" ) alphanum
//! toplabel      = ALPHA / ALPHA *( alphanum / "-" ) alphanum
//! netbios-name  = ( alphanum / "_" ) 1*14( alphanum / "_" / "-" )
//! ```
//!
//! The `netbios-name` alternative is only part of the grammar when the
//! [`HostGrammar`] enables it, as [`HostGrammar::smb`] does.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::constants::{MAX_NETBIOS_NAME_LENGTH, MIN_NETBIOS_NAME_LENGTH};
use crate::error::HostError;

/// The shape a host string was recognized as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// A DNS hostname (e.g., "fileserver.example.com")
    Domain(String),
    /// An IPv4 address (e.g., "10.0.0.1")
    Ipv4(Ipv4Addr),
    /// A bracketed IPv6 literal (e.g., `[::1]`)
    Ipv6(Ipv6Addr),
    /// A NetBIOS name that is not also a DNS hostname (e.g., "file_srv")
    NetBios(String),
}

impl Host {
    /// Returns true if this host was recognized only through the NetBIOS
    /// alternative.
    #[must_use]
    pub const fn is_netbios(&self) -> bool {
        matches!(self, Self::NetBios(_))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(d) | Self::NetBios(d) => write!(f, "{d}"),
            Self::Ipv4(ip) => write!(f, "{ip}"),
            Self::Ipv6(ip) => write!(f, "[{ip}]"),
        }
    }
}

/// An immutable hostname grammar.
///
/// The generic grammar accepts DNS hostnames and IP addresses. The SMB
/// grammar additionally accepts NetBIOS names of 2 to 15 characters.
/// Grammars are plain values: build one once and pass it to every parse.
///
/// # Examples
///
/// ```
/// use smb_uri::{Host, HostGrammar};
///
/// let grammar = HostGrammar::smb();
/// assert!(matches!(grammar.classify("foo_bar"), Ok(Host::NetBios(_))));
/// assert!(HostGrammar::generic().classify("foo_bar").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HostGrammar {
    netbios: bool,
}

impl HostGrammar {
    /// The generic URI host grammar: DNS hostnames and IP addresses.
    #[must_use]
    pub const fn generic() -> Self {
        Self { netbios: false }
    }

    /// The SMB host grammar: the generic grammar plus NetBIOS names.
    #[must_use]
    pub const fn smb() -> Self {
        Self { netbios: true }
    }

    /// Enables or disables the NetBIOS name alternative.
    #[must_use]
    pub const fn with_netbios(mut self, netbios: bool) -> Self {
        self.netbios = netbios;
        self
    }

    /// Returns true if NetBIOS names are accepted.
    #[must_use]
    pub const fn accepts_netbios(&self) -> bool {
        self.netbios
    }

    /// Returns true if `host` matches this grammar.
    #[must_use]
    pub fn matches(&self, host: &str) -> bool {
        self.classify(host).is_ok()
    }

    /// Classifies `host` against the alternatives of this grammar.
    ///
    /// # Errors
    ///
    /// Returns `HostError` if the host is empty, is a malformed IPv6
    /// literal, or matches none of the alternatives.
    pub fn classify(&self, host: &str) -> Result<Host, HostError> {
        if host.is_empty() {
            return Err(HostError::Empty);
        }

        if let Some(inner) = host.strip_prefix('[') {
            let Some(literal) = inner.strip_suffix(']') else {
                return Err(HostError::InvalidIpv6 {
                    value: inner.to_string(),
                });
            };
            return literal
                .parse::<Ipv6Addr>()
                .map(Host::Ipv6)
                .map_err(|_| HostError::InvalidIpv6 {
                    value: literal.to_string(),
                });
        }

        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return Ok(Host::Ipv4(ip));
        }

        if is_dns_hostname(host) {
            return Ok(Host::Domain(host.to_string()));
        }

        if self.netbios && is_netbios_name(host) {
            return Ok(Host::NetBios(host.to_string()));
        }

        Err(HostError::NoMatch {
            host: host.to_string(),
            netbios: self.netbios,
        })
    }
}

/// Returns true if `host` is a DNS hostname.
///
/// The last label must start with a letter, which keeps dotted numbers
/// that are not valid IPv4 addresses out.
#[must_use]
pub fn is_dns_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let Some((top, domain)) = labels.split_last() else {
        return false;
    };

    domain.iter().all(|label| is_label(label))
        && is_label(top)
        && top.starts_with(|c: char| c.is_ascii_alphabetic())
}

/// Returns true if `name` is a NetBIOS name: 2 to 15 characters, the first
/// alphanumeric or underscore, the rest alphanumeric, underscore or hyphen.
#[must_use]
pub fn is_netbios_name(name: &str) -> bool {
    let len = name.len();
    if !(MIN_NETBIOS_NAME_LENGTH..=MAX_NETBIOS_NAME_LENGTH).contains(&len) {
        return false;
    }

    name.char_indices()
        .all(|(i, c)| c.is_ascii_alphanumeric() || c == '_' || (i > 0 && c == '-'))
}

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !label.starts_with('-')
        && !label.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_domain() {
        let host = HostGrammar::generic().classify("example.jp").unwrap();
        assert_eq!(host, Host::Domain("example.jp".to_string()));
    }

    #[test]
    fn classify_preserves_case() {
        let host = HostGrammar::generic().classify("FileServer").unwrap();
        assert_eq!(host.to_string(), "FileServer");
    }

    #[test]
    fn classify_trailing_dot() {
        assert!(HostGrammar::generic().matches("example.jp."));
    }

    #[test]
    fn classify_ipv4() {
        let host = HostGrammar::generic().classify("10.0.0.1").unwrap();
        assert!(matches!(host, Host::Ipv4(_)));
    }

    #[test]
    fn classify_ipv6_literal() {
        let host = HostGrammar::generic().classify("[::1]").unwrap();
        assert!(matches!(host, Host::Ipv6(_)));
        assert_eq!(host.to_string(), "[::1]");
    }

    #[test]
    fn classify_bad_ipv6_fails() {
        let result = HostGrammar::generic().classify("[::zz]");
        assert!(matches!(result, Err(HostError::InvalidIpv6 { .. })));
    }

    #[test]
    fn numeric_top_label_is_not_a_hostname() {
        assert!(!is_dns_hostname("300.1.1.1"));
        assert!(HostGrammar::generic().classify("300.1.1.1").is_err());
    }

    #[test]
    fn label_with_hyphen_edges_fails() {
        assert!(!is_dns_hostname("-server"));
        assert!(!is_dns_hostname("server-.example"));
        assert!(!is_dns_hostname("a..b"));
    }

    #[test]
    fn underscore_needs_netbios() {
        assert!(HostGrammar::generic().classify("foo_bar").is_err());
        let host = HostGrammar::smb().classify("foo_bar").unwrap();
        assert!(host.is_netbios());
    }

    #[test]
    fn dns_wins_over_netbios() {
        let host = HostGrammar::smb().classify("server").unwrap();
        assert!(!host.is_netbios());
    }

    #[test]
    fn netbios_length_boundary() {
        assert!(is_netbios_name("foo_barxxxxxxxx"));
        assert!(!is_netbios_name("foo_barxxxxxxxxx"));
        assert!(!is_netbios_name("_"));
        assert!(is_netbios_name("_a"));
    }

    #[test]
    fn netbios_rejects_leading_hyphen() {
        assert!(!is_netbios_name("-ab"));
        assert!(is_netbios_name("a-_"));
    }

    #[test]
    fn empty_host_fails() {
        assert_eq!(HostGrammar::smb().classify(""), Err(HostError::Empty));
    }

    #[test]
    fn with_netbios_toggles() {
        let grammar = HostGrammar::smb().with_netbios(false);
        assert_eq!(grammar, HostGrammar::generic());
        assert!(!grammar.accepts_netbios());
    }
}
