//! Main SMB URI type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use tracing::{debug, trace};

use crate::constants::{DEFAULT_PORT, SCHEME};
use crate::error::{InvalidFormat, InvalidFormatKind};
use crate::generic::GenericUri;
use crate::host::{Host, HostGrammar};
use crate::netbios::{NetbiosParam, NetbiosParams, NodeType};
use crate::registry::UriScheme;

/// A parsed and validated SMB URI.
///
/// # Structure
///
/// ```text
/// smb://[userinfo@]<host>[:port][/share[/path]][?param=value[&param=value...]]
/// ```
///
/// The share is the first path segment. The query holds NetBIOS
/// parameters only (see [`NetbiosParam`]). Fragments are not allowed.
///
/// Every setter validates its value first and then rebuilds the path or
/// query, so the typed fields and the serialized form never disagree.
///
/// # Examples
///
/// ```
/// use smb_uri::SmbUri;
///
/// let mut uri = SmbUri::parse("smb://server/share/dir?wins=10.0.0.1").unwrap();
/// assert_eq!(uri.share(), "share");
/// assert_eq!(uri.nbns(), Some("10.0.0.1"));
/// assert_eq!(uri.port(), 445);
/// assert_eq!(uri.to_string(), "smb://server/share/dir?nbns=10.0.0.1");
///
/// uri.set_share("other").unwrap();
/// uri.set_workgroup(Some("DOMAIN")).unwrap();
/// assert_eq!(uri.to_string(), "smb://server/other/dir?nbns=10.0.0.1&workgroup=DOMAIN");
/// ```
#[derive(Debug, Clone)]
pub struct SmbUri {
    generic: GenericUri,
    grammar: HostGrammar,
    share: Option<String>,
    params: NetbiosParams,
}

impl SmbUri {
    /// The component names of an SMB URI, in canonical order.
    pub const COMPONENTS: [&'static str; 13] = [
        "scheme",
        "userinfo",
        "host",
        "port",
        "share",
        "path",
        "nbns",
        "workgroup",
        "calling",
        "called",
        "broadcast",
        "nodetype",
        "scopeid",
    ];

    /// Parses an SMB URI using the SMB host grammar, which accepts
    /// NetBIOS names as hosts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if:
    /// - The URI is not a well-formed `smb://` URI with a host
    /// - The host is neither a DNS hostname, an IP address nor a NetBIOS name
    /// - The URI has a fragment
    /// - The query holds unknown keys or invalid NetBIOS parameter values
    pub fn parse(input: &str) -> Result<Self, InvalidFormat> {
        Self::parse_with(input, &HostGrammar::smb())
    }

    /// Parses an SMB URI using the given host grammar.
    ///
    /// # Errors
    ///
    /// See [`SmbUri::parse`].
    pub fn parse_with(input: &str, grammar: &HostGrammar) -> Result<Self, InvalidFormat> {
        let generic = GenericUri::parse(input, grammar).inspect_err(|e| {
            debug!(input, error = %e.kind, "rejected SMB URI");
        })?;
        Self::from_generic(generic, grammar)
    }

    /// Builds an SMB URI from already-parsed generic components.
    ///
    /// The default port is applied, the share is taken from the path and
    /// the query is split into NetBIOS parameters and rewritten in
    /// canonical form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the scheme is not `smb`, there is no host,
    /// there is a fragment, or the query is rejected.
    pub fn from_generic(generic: GenericUri, grammar: &HostGrammar) -> Result<Self, InvalidFormat> {
        let input = generic.to_string();
        Self::decompose_parts(generic, *grammar).map_err(|kind| {
            debug!(input = %input, error = %kind, "rejected SMB URI");
            InvalidFormat::new(input, kind)
        })
    }

    /// Returns the scheme, always `smb`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.generic.scheme()
    }

    /// Returns the userinfo, if present.
    #[must_use]
    pub fn userinfo(&self) -> Option<&str> {
        self.generic.userinfo()
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        self.generic.host().unwrap_or_default()
    }

    /// Returns true if the host is only valid as a NetBIOS name.
    #[must_use]
    pub fn is_netbios_host(&self) -> bool {
        matches!(self.grammar.classify(self.host()), Ok(Host::NetBios(_)))
    }

    /// Returns the port, or 445 when none was given.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.generic.port().unwrap_or(DEFAULT_PORT)
    }

    /// Returns the share name, or an empty string if the path has none.
    #[must_use]
    pub fn share(&self) -> &str {
        self.share.as_deref().unwrap_or_default()
    }

    /// Returns the full path, including the leading `/share`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.generic.path()
    }

    /// Returns the canonical query, if any NetBIOS parameter is set.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.generic.query()
    }

    /// Returns the NetBIOS parameters.
    #[must_use]
    pub const fn params(&self) -> &NetbiosParams {
        &self.params
    }

    /// Returns the value of a NetBIOS parameter, if present.
    #[must_use]
    pub fn param(&self, param: NetbiosParam) -> Option<&str> {
        self.params.get(param)
    }

    /// Returns the NetBIOS name server (WINS) address.
    #[must_use]
    pub fn nbns(&self) -> Option<&str> {
        self.param(NetbiosParam::Nbns)
    }

    /// Alias of [`SmbUri::nbns`].
    #[must_use]
    pub fn wins(&self) -> Option<&str> {
        self.nbns()
    }

    /// Returns the workgroup (or NT domain) name.
    #[must_use]
    pub fn workgroup(&self) -> Option<&str> {
        self.param(NetbiosParam::Workgroup)
    }

    /// Alias of [`SmbUri::workgroup`].
    #[must_use]
    pub fn ntdomain(&self) -> Option<&str> {
        self.workgroup()
    }

    /// Returns the NetBIOS source name or address.
    #[must_use]
    pub fn calling(&self) -> Option<&str> {
        self.param(NetbiosParam::Calling)
    }

    /// Returns the NetBIOS destination name or address.
    #[must_use]
    pub fn called(&self) -> Option<&str> {
        self.param(NetbiosParam::Called)
    }

    /// Returns the broadcast address.
    #[must_use]
    pub fn broadcast(&self) -> Option<&str> {
        self.param(NetbiosParam::Broadcast)
    }

    /// Returns the NetBIOS node type as written.
    #[must_use]
    pub fn nodetype(&self) -> Option<&str> {
        self.param(NetbiosParam::NodeType)
    }

    /// Returns the NetBIOS node type, if set to a non-empty value.
    #[must_use]
    pub fn node_type(&self) -> Option<NodeType> {
        self.nodetype().and_then(|v| v.parse().ok())
    }

    /// Returns the NetBIOS scope ID.
    #[must_use]
    pub fn scopeid(&self) -> Option<&str> {
        self.param(NetbiosParam::ScopeId)
    }

    /// Returns the host grammar this URI validates against.
    #[must_use]
    pub const fn grammar(&self) -> &HostGrammar {
        &self.grammar
    }

    /// Returns the generic components.
    #[must_use]
    pub const fn as_generic(&self) -> &GenericUri {
        &self.generic
    }

    /// Replaces the userinfo.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value holds a character the userinfo
    /// grammar forbids. The URI is unchanged on error.
    pub fn set_userinfo(&mut self, userinfo: Option<&str>) -> Result<(), InvalidFormat> {
        self.generic
            .set_userinfo(userinfo)
            .inspect_err(|e| reject("userinfo", e))
    }

    /// Replaces the host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the host does not match this URI's
    /// grammar. The URI is unchanged on error.
    pub fn set_host(&mut self, host: &str) -> Result<(), InvalidFormat> {
        self.generic
            .set_host(host, &self.grammar)
            .inspect_err(|e| reject("host", e))
    }

    /// Replaces the port. `None` restores the default port.
    pub fn set_port(&mut self, port: Option<u16>) {
        self.generic.set_port(port);
    }

    /// Replaces the whole path and takes the share from it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid URI path, or is
    /// not empty and does not start with `/`. The URI is unchanged on
    /// error.
    pub fn set_path(&mut self, path: &str) -> Result<(), InvalidFormat> {
        self.generic
            .set_path(path)
            .inspect_err(|e| reject("path", e))?;
        self.share = parse_share(path).map(str::to_string);
        Ok(())
    }

    /// Replaces the query, splitting it into NetBIOS parameters and
    /// rewriting it in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid URI query, or
    /// holds unknown keys or invalid parameter values. The URI is unchanged
    /// on error.
    pub fn set_query(&mut self, query: Option<&str>) -> Result<(), InvalidFormat> {
        let params = match query {
            Some(q) => {
                self.generic
                    .clone()
                    .set_query(Some(q))
                    .inspect_err(|e| reject("query", e))?;
                NetbiosParams::decompose(q, &self.grammar)
                    .map_err(|kind| InvalidFormat::new(q, kind))
                    .inspect_err(|e| reject("query", e))?
            }
            None => NetbiosParams::new(),
        };
        self.params = params;
        self.build_query();
        Ok(())
    }

    /// Replaces the share, keeping the rest of the path.
    ///
    /// Use [`SmbUri::clear_share`] to remove the share.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the share is empty, contains `/`, or is
    /// not valid as a path segment. The URI is unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use smb_uri::SmbUri;
    ///
    /// let mut uri = SmbUri::parse("smb://server/share/deep/path").unwrap();
    /// uri.set_share("other").unwrap();
    /// assert_eq!(uri.path(), "/other/deep/path");
    /// assert!(uri.set_share("a/b").is_err());
    /// assert_eq!(uri.path(), "/other/deep/path");
    /// ```
    pub fn set_share(&mut self, share: &str) -> Result<(), InvalidFormat> {
        check_share(&self.generic, share)
            .map_err(|kind| InvalidFormat::new(share, kind))
            .inspect_err(|e| reject("share", e))?;
        self.share = Some(share.to_string());
        self.build_path();
        Ok(())
    }

    /// Removes the share. Without a share there is no path, so the whole
    /// path is cleared.
    pub fn clear_share(&mut self) {
        self.share = None;
        self.build_path();
    }

    /// Sets or clears a NetBIOS parameter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if [`NetbiosParam::validate`] rejects the
    /// value. The URI is unchanged on error.
    pub fn set_param(&mut self, param: NetbiosParam, value: Option<&str>) -> Result<(), InvalidFormat> {
        if let Some(v) = value {
            param
                .validate(v, &self.grammar)
                .map_err(|kind| InvalidFormat::new(v, kind))
                .inspect_err(|e| reject(param.key(), e))?;
        }
        self.params.set(param, value.map(str::to_string));
        self.build_query();
        Ok(())
    }

    /// Sets the NetBIOS name server (WINS) address.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_nbns(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_param(NetbiosParam::Nbns, value)
    }

    /// Alias of [`SmbUri::set_nbns`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_wins(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_nbns(value)
    }

    /// Sets the workgroup (or NT domain) name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_workgroup(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_param(NetbiosParam::Workgroup, value)
    }

    /// Alias of [`SmbUri::set_workgroup`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_ntdomain(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_workgroup(value)
    }

    /// Sets the NetBIOS source name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_calling(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_param(NetbiosParam::Calling, value)
    }

    /// Sets the NetBIOS destination name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not a valid host.
    pub fn set_called(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_param(NetbiosParam::Called, value)
    }

    /// Sets the broadcast address. Any value is accepted.
    pub fn set_broadcast(&mut self, value: Option<&str>) {
        self.params.set(NetbiosParam::Broadcast, value.map(str::to_string));
        self.build_query();
    }

    /// Sets the NetBIOS node type from its letter, in either case.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the value is not one of `b`, `p`, `m`, `h`.
    pub fn set_nodetype(&mut self, value: Option<&str>) -> Result<(), InvalidFormat> {
        self.set_param(NetbiosParam::NodeType, value)
    }

    /// Sets the NetBIOS node type.
    pub fn set_node_type(&mut self, node_type: Option<NodeType>) {
        self.params.set(
            NetbiosParam::NodeType,
            node_type.map(|n| n.as_char().to_string()),
        );
        self.build_query();
    }

    /// Sets the NetBIOS scope ID. Any value is accepted.
    pub fn set_scopeid(&mut self, value: Option<&str>) {
        self.params.set(NetbiosParam::ScopeId, value.map(str::to_string));
        self.build_query();
    }

    fn decompose_parts(
        mut generic: GenericUri,
        grammar: HostGrammar,
    ) -> Result<Self, InvalidFormatKind> {
        if generic.scheme() != SCHEME {
            return Err(InvalidFormatKind::SchemeMismatch {
                expected: SCHEME,
                found: generic.scheme().to_string(),
            });
        }
        if generic.fragment().is_some() {
            return Err(InvalidFormatKind::FragmentNotAllowed);
        }
        if generic.host().is_none() {
            return Err(InvalidFormatKind::MissingHost);
        }

        let share = parse_share(generic.path()).map(str::to_string);
        let params = match generic.query() {
            Some(q) => NetbiosParams::decompose(q, &grammar)?,
            None => NetbiosParams::new(),
        };
        generic = generic.with_default_port(DEFAULT_PORT);

        let mut uri = Self {
            generic,
            grammar,
            share,
            params,
        };
        uri.build_query();
        trace!(uri = %uri, "decomposed SMB URI");
        Ok(uri)
    }

    fn build_path(&mut self) {
        let path = rebuild_path(self.share.as_deref(), self.generic.path());
        self.generic.replace_path(path);
        trace!(path = self.generic.path(), "rebuilt SMB URI path");
    }

    fn build_query(&mut self) {
        self.generic.replace_query(self.params.recompose());
        trace!(query = ?self.generic.query(), "rebuilt SMB URI query");
    }
}

impl UriScheme for SmbUri {
    const NAME: &'static str = SCHEME;
    const DEFAULT_PORT: Option<u16> = Some(DEFAULT_PORT);

    fn host_grammar() -> HostGrammar {
        HostGrammar::smb()
    }

    fn decompose(generic: GenericUri, grammar: &HostGrammar) -> Result<Self, InvalidFormat> {
        Self::from_generic(generic, grammar)
    }

    fn generic(&self) -> &GenericUri {
        &self.generic
    }
}

/// Returns the first non-empty segment after a `/`, if any.
fn parse_share(path: &str) -> Option<&str> {
    path.split('/').skip(1).find(|segment| !segment.is_empty())
}

/// Puts `share` in place of the first segment of `path`.
fn rebuild_path(share: Option<&str>, path: &str) -> String {
    let Some(share) = share else {
        return String::new();
    };
    let remainder = match path.strip_prefix('/') {
        Some(after) => &after[after.find('/').unwrap_or(after.len())..],
        None => path,
    };
    format!("/{share}{remainder}")
}

fn check_share(generic: &GenericUri, share: &str) -> Result<(), InvalidFormatKind> {
    if share.is_empty() {
        return Err(InvalidFormatKind::EmptyShare);
    }
    generic
        .clone()
        .set_path(&format!("/{share}"))
        .map_err(|e| e.kind)?;
    if share.contains('/') {
        return Err(InvalidFormatKind::ShareContainsSlash);
    }
    Ok(())
}

fn reject(component: &str, error: &InvalidFormat) {
    debug!(component, value = %error.input, error = %error.kind, "rejected SMB URI component");
}

impl fmt::Display for SmbUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.generic)
    }
}

impl FromStr for SmbUri {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for SmbUri {
    type Error = InvalidFormat;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl AsRef<GenericUri> for SmbUri {
    fn as_ref(&self) -> &GenericUri {
        &self.generic
    }
}

impl PartialEq for SmbUri {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for SmbUri {}

impl Hash for SmbUri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl PartialOrd for SmbUri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmbUri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SmbUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SmbUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
