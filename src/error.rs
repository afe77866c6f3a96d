//! Error types for SMB URI parsing and mutation.

use std::fmt;

use crate::netbios::NetbiosParam;

/// The error returned when a URI string or a component value is not a
/// valid part of an SMB URI.
///
/// This is the only error surfaced by the crate. It carries the offending
/// input and a [`InvalidFormatKind`] describing what was wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFormat {
    /// The input that was rejected
    pub input: String,
    /// The specific reason for the rejection
    pub kind: InvalidFormatKind,
}

impl InvalidFormat {
    pub(crate) fn new(input: impl Into<String>, kind: InvalidFormatKind) -> Self {
        Self {
            input: input.into(),
            kind,
        }
    }
}

/// Specific reasons for an [`InvalidFormat`] error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidFormatKind {
    /// The URI string is empty
    Empty,
    /// No `scheme:` prefix was found
    MissingScheme,
    /// The scheme is not the one the target type handles
    SchemeMismatch {
        /// The scheme the type handles
        expected: &'static str,
        /// The scheme that was found
        found: String,
    },
    /// The input is not a URI under the RFC 3986 grammar
    Syntax {
        /// What the URI parser reported
        message: String,
    },
    /// A component value does not survive being written into its slot
    /// and parsed back
    InvalidComponent {
        /// Name of the component
        component: &'static str,
    },
    /// A path without a leading `/` was given to a URI that has a host
    RelativePath,
    /// The URI has no authority, or an empty host
    MissingHost,
    /// The host matched no alternative of the hostname grammar
    InvalidHost(HostError),
    /// The port is not a number in `0..=65535`
    InvalidPort {
        /// The rejected port text
        value: String,
    },
    /// The URI carries a `#fragment`, which the scheme does not admit
    FragmentNotAllowed,
    /// The query holds keys that are not NetBIOS parameters
    UnknownParams {
        /// The unrecognized keys, in input order
        names: Vec<String>,
    },
    /// A share name contains `/`
    ShareContainsSlash,
    /// A share name is empty
    EmptyShare,
    /// A NetBIOS name parameter does not match the host grammar
    InvalidParam {
        /// The parameter that was rejected
        param: NetbiosParam,
        /// The rejected value
        value: String,
    },
    /// The node type is not one of `b`, `p`, `m`, `h`
    InvalidNodeType {
        /// The rejected value
        value: String,
    },
}

impl fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bad SMB URI '{}': {}", self.input, self.kind)
    }
}

impl fmt::Display for InvalidFormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "URI cannot be empty"),
            Self::MissingScheme => write!(f, "missing scheme"),
            Self::SchemeMismatch { expected, found } => {
                write!(f, "expected scheme '{expected}', found '{found}'")
            }
            Self::Syntax { message } => write!(f, "malformed URI: {message}"),
            Self::InvalidComponent { component } => write!(f, "invalid {component}"),
            Self::RelativePath => write!(f, "path must start with '/' when a host is present"),
            Self::MissingHost => write!(f, "missing host"),
            Self::InvalidHost(e) => write!(f, "invalid host: {e}"),
            Self::InvalidPort { value } => {
                write!(f, "invalid port '{value}': port must be 0-65535")
            }
            Self::FragmentNotAllowed => write!(f, "fragment not allowed"),
            Self::UnknownParams { names } => {
                write!(f, "bad query parameter(s): {}", names.join(","))
            }
            Self::ShareContainsSlash => write!(f, "bad share component ('/' not allowed)"),
            Self::EmptyShare => write!(f, "bad share component (empty)"),
            Self::InvalidParam { param, value } => {
                write!(f, "bad {}: {value}", param.description())
            }
            Self::InvalidNodeType { value } => {
                write!(f, "bad nodetype '{value}'; expected one of b, p, m, h")
            }
        }
    }
}

impl std::error::Error for InvalidFormat {}

/// Errors for hostname classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Host is empty
    Empty,
    /// Bracketed literal is not a valid IPv6 address
    InvalidIpv6 {
        /// The text between the brackets
        value: String,
    },
    /// Host matches neither the DNS nor (when enabled) the NetBIOS grammar
    NoMatch {
        /// The rejected host
        host: String,
        /// Whether the NetBIOS alternative was tried
        netbios: bool,
    },
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "host cannot be empty"),
            Self::InvalidIpv6 { value } => write!(f, "invalid IPv6 literal '{value}'"),
            Self::NoMatch {
                host,
                netbios: true,
            } => {
                write!(f, "'{host}' is neither a DNS hostname, an IP address nor a NetBIOS name")
            }
            Self::NoMatch {
                host,
                netbios: false,
            } => {
                write!(f, "'{host}' is neither a DNS hostname nor an IP address")
            }
        }
    }
}

impl std::error::Error for HostError {}
