//! Generic URI components shared by every scheme.
//!
//! Splitting and syntax checks follow RFC 3986 and are done by
//! [`fluent_uri`]. This module keeps the split components in owned slots
//! that scheme types can rewrite, checks hosts against a [`HostGrammar`],
//! and formats the slots back, eliding the scheme's default port.
//!
//! Components are kept in their escaped form. Nothing is decoded, so
//! formatting a parsed URI reproduces its input.

use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidFormat, InvalidFormatKind};
use crate::host::HostGrammar;

/// The component slots of a generic hierarchical URI.
///
/// Scheme-specific types such as [`SmbUri`](crate::SmbUri) are built on top
/// of this value and keep it in sync with their own typed fields.
///
/// # Examples
///
/// ```
/// use smb_uri::{GenericUri, HostGrammar};
///
/// let uri = GenericUri::parse("http://user@example.com:8080/a/b?x=1", &HostGrammar::generic()).unwrap();
/// assert_eq!(uri.scheme(), "http");
/// assert_eq!(uri.userinfo(), Some("user"));
/// assert_eq!(uri.host(), Some("example.com"));
/// assert_eq!(uri.port(), Some(8080));
/// assert_eq!(uri.path(), "/a/b");
/// assert_eq!(uri.query(), Some("x=1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericUri {
    scheme: String,
    userinfo: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    default_port: Option<u16>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

/// Components exactly as the RFC 3986 parser split them.
struct RawParts {
    scheme: String,
    userinfo: Option<String>,
    host: Option<String>,
    port: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl RawParts {
    fn split(input: &str) -> Result<Self, InvalidFormatKind> {
        if input.is_empty() {
            return Err(InvalidFormatKind::Empty);
        }
        if !input.contains(':') {
            return Err(InvalidFormatKind::MissingScheme);
        }

        let uri = fluent_uri::Uri::parse(input).map_err(|e| InvalidFormatKind::Syntax {
            message: e.to_string(),
        })?;

        let (userinfo, host, port) = match uri.authority() {
            Some(auth) => (
                auth.userinfo().map(|u| u.as_str().to_owned()),
                Some(auth.host().to_owned()).filter(|h| !h.is_empty()),
                auth.port().map(|p| p.to_string()),
            ),
            None => (None, None, None),
        };

        Ok(Self {
            scheme: uri.scheme().as_str().to_ascii_lowercase(),
            userinfo,
            host,
            port,
            path: uri.path().as_str().to_owned(),
            query: uri.query().map(|q| q.as_str().to_owned()),
            fragment: uri.fragment().map(|f| f.as_str().to_owned()),
        })
    }
}

impl GenericUri {
    /// Creates a URI with the given scheme and host and every other
    /// component empty.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the scheme is malformed or the host does
    /// not match `grammar`.
    pub fn new(scheme: &str, host: &str, grammar: &HostGrammar) -> Result<Self, InvalidFormat> {
        let scheme_ok = RawParts::split(&format!("{scheme}:"))
            .is_ok_and(|raw| raw.scheme.eq_ignore_ascii_case(scheme));
        if !scheme_ok {
            return Err(InvalidFormat::new(
                scheme,
                InvalidFormatKind::InvalidComponent { component: "scheme" },
            ));
        }

        let mut uri = Self {
            scheme: scheme.to_ascii_lowercase(),
            userinfo: None,
            host: None,
            port: None,
            default_port: None,
            path: String::new(),
            query: None,
            fragment: None,
        };
        uri.set_host(host, grammar)?;
        Ok(uri)
    }

    /// Parses a URI string into its generic components.
    ///
    /// Hosts are checked against `grammar`. An empty query or fragment
    /// (a trailing `?` or `#`) is kept as `Some("")`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if:
    /// - The input is empty or has no scheme
    /// - The input is not an RFC 3986 URI
    /// - The host does not match `grammar`
    /// - The port is not a number in `0..=65535`
    pub fn parse(input: &str, grammar: &HostGrammar) -> Result<Self, InvalidFormat> {
        Self::parse_inner(input, grammar).map_err(|kind| InvalidFormat::new(input, kind))
    }

    /// Returns the scheme, lowercased.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the userinfo, if present.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.userinfo.as_deref()
    }

    /// Returns the host, if the URI has a non-empty authority.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the explicit port, or the scheme's default port.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port.or(self.default_port)
    }

    /// Returns the port the scheme falls back to when none is given.
    #[must_use]
    pub const fn default_port(&self) -> Option<u16> {
        self.default_port
    }

    /// Returns the path, which is empty or starts with `/` when the URI has
    /// an authority.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query, if present.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Returns the fragment, if present. A trailing `#` gives `Some("")`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Sets the port a scheme implies when the URI names none.
    #[must_use]
    pub const fn with_default_port(mut self, port: u16) -> Self {
        self.default_port = Some(port);
        self
    }

    /// Replaces the userinfo.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid RFC 3986
    /// userinfo.
    pub fn set_userinfo(&mut self, userinfo: Option<&str>) -> Result<(), InvalidFormat> {
        let Some(value) = userinfo else {
            self.userinfo = None;
            return Ok(());
        };
        let candidate = Self {
            userinfo: Some(value.to_string()),
            ..self.clone()
        };
        self.commit(candidate, "userinfo", value, |raw| {
            raw.userinfo.as_deref() == Some(value)
        })
    }

    /// Replaces the host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the host does not match `grammar`.
    pub fn set_host(&mut self, host: &str, grammar: &HostGrammar) -> Result<(), InvalidFormat> {
        grammar
            .classify(host)
            .map_err(|e| InvalidFormat::new(host, InvalidFormatKind::InvalidHost(e)))?;
        self.host = Some(host.to_string());
        Ok(())
    }

    /// Replaces the explicit port. `None` falls back to the default port.
    pub fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    /// Replaces the path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the path is not a valid RFC 3986 path, or
    /// does not start with `/` while the URI has a host.
    pub fn set_path(&mut self, path: &str) -> Result<(), InvalidFormat> {
        if self.host.is_some() && !path.is_empty() && !path.starts_with('/') {
            return Err(InvalidFormat::new(path, InvalidFormatKind::RelativePath));
        }
        let candidate = Self {
            path: path.to_string(),
            ..self.clone()
        };
        self.commit(candidate, "path", path, |raw| raw.path == path)
    }

    /// Replaces the query.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid RFC 3986 query.
    pub fn set_query(&mut self, query: Option<&str>) -> Result<(), InvalidFormat> {
        let Some(value) = query else {
            self.query = None;
            return Ok(());
        };
        let candidate = Self {
            query: Some(value.to_string()),
            ..self.clone()
        };
        self.commit(candidate, "query", value, |raw| {
            raw.query.as_deref() == Some(value)
        })
    }

    pub(crate) fn replace_path(&mut self, path: String) {
        self.path = path;
    }

    pub(crate) fn replace_query(&mut self, query: Option<String>) {
        self.query = query;
    }

    /// Formats `candidate`, parses it again and keeps it only if the
    /// changed component comes back as written.
    fn commit(
        &mut self,
        candidate: Self,
        component: &'static str,
        value: &str,
        round_trips: impl FnOnce(&RawParts) -> bool,
    ) -> Result<(), InvalidFormat> {
        let formatted = candidate.to_string();
        if !RawParts::split(&formatted).is_ok_and(|raw| round_trips(&raw)) {
            return Err(InvalidFormat::new(
                value,
                InvalidFormatKind::InvalidComponent { component },
            ));
        }
        *self = candidate;
        Ok(())
    }

    fn parse_inner(input: &str, grammar: &HostGrammar) -> Result<Self, InvalidFormatKind> {
        let raw = RawParts::split(input)?;

        if let Some(host) = &raw.host {
            grammar.classify(host).map_err(InvalidFormatKind::InvalidHost)?;
        }
        let port = match raw.port.as_deref() {
            None | Some("") => None,
            Some(value) => Some(value.parse::<u16>().map_err(|_| {
                InvalidFormatKind::InvalidPort {
                    value: value.to_string(),
                }
            })?),
        };

        Ok(Self {
            scheme: raw.scheme,
            userinfo: raw.userinfo,
            host: raw.host,
            port,
            default_port: None,
            path: raw.path,
            query: raw.query,
            fragment: raw.fragment,
        })
    }
}

impl fmt::Display for GenericUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;

        if self.host.is_some() || self.userinfo.is_some() {
            f.write_str("//")?;
            if let Some(userinfo) = &self.userinfo {
                write!(f, "{userinfo}@")?;
            }
            if let Some(host) = &self.host {
                f.write_str(host)?;
            }
            if let Some(port) = self.port.filter(|p| Some(*p) != self.default_port) {
                write!(f, ":{port}")?;
            }
        }

        f.write_str(&self.path)?;

        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for GenericUri {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &HostGrammar::generic())
    }
}
