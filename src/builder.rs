//! Typestate builder for constructing [`SmbUri`] instances from explicit
//! component values.

use std::marker::PhantomData;

use crate::constants::SCHEME;
use crate::error::InvalidFormat;
use crate::generic::GenericUri;
use crate::host::HostGrammar;
use crate::netbios::NetbiosParam;
use crate::smb::SmbUri;

/// Marker: No host set yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

/// Marker: Host has been set, ready to build.
#[derive(Debug, Clone, Copy, Default)]
pub struct HasHost;

/// A builder for [`SmbUri`] values.
///
/// The host is the only required component; `build()` is only available
/// once it is set. Every value goes through the same validation as the
/// matching [`SmbUri`] setter, so `build()` fails with the first rejected
/// component.
///
/// # Examples
///
/// ```
/// use smb_uri::{NetbiosParam, SmbUriBuilder};
///
/// let uri = SmbUriBuilder::new()
///     .host("fileserver")
///     .userinfo("DOMAIN;alice")
///     .path("/public/docs")
///     .share("private")
///     .param(NetbiosParam::Workgroup, "DOMAIN")
///     .param(NetbiosParam::Nbns, "10.0.0.1")
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     uri.to_string(),
///     "smb://DOMAIN;alice@fileserver/private/docs?nbns=10.0.0.1&workgroup=DOMAIN"
/// );
/// ```
///
/// ```compile_fail
/// use smb_uri::SmbUriBuilder;
///
/// // Error: cannot build without a host
/// let uri = SmbUriBuilder::new().share("public").build();
/// ```
#[derive(Debug, Clone)]
pub struct SmbUriBuilder<State = NoHost> {
    grammar: HostGrammar,
    host: Option<String>,
    userinfo: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    share: Option<String>,
    params: Vec<(NetbiosParam, String)>,
    _state: PhantomData<State>,
}

impl SmbUriBuilder<NoHost> {
    /// Creates a new builder using the SMB host grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grammar: HostGrammar::smb(),
            host: None,
            userinfo: None,
            port: None,
            path: None,
            share: None,
            params: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Sets the host and advances to the [`HasHost`] state.
    #[must_use]
    pub fn host(self, host: &str) -> SmbUriBuilder<HasHost> {
        SmbUriBuilder {
            grammar: self.grammar,
            host: Some(host.to_string()),
            userinfo: self.userinfo,
            port: self.port,
            path: self.path,
            share: self.share,
            params: self.params,
            _state: PhantomData,
        }
    }
}

impl Default for SmbUriBuilder<NoHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State> SmbUriBuilder<State> {
    /// Uses `grammar` instead of the SMB host grammar.
    #[must_use]
    pub const fn grammar(mut self, grammar: HostGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Sets the userinfo.
    #[must_use]
    pub fn userinfo(mut self, userinfo: &str) -> Self {
        self.userinfo = Some(userinfo.to_string());
        self
    }

    /// Sets an explicit port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the whole path, including the share segment.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Sets the share. Applied after `path`, replacing its first segment.
    #[must_use]
    pub fn share(mut self, share: &str) -> Self {
        self.share = Some(share.to_string());
        self
    }

    /// Sets a NetBIOS parameter. Later values for the same parameter win.
    #[must_use]
    pub fn param(mut self, param: NetbiosParam, value: &str) -> Self {
        self.params.push((param, value.to_string()));
        self
    }
}

impl SmbUriBuilder<HasHost> {
    /// Builds the URI.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for the first component that fails
    /// validation.
    pub fn build(self) -> Result<SmbUri, InvalidFormat> {
        let host = self.host.as_deref().unwrap_or_default();
        let mut generic = GenericUri::new(SCHEME, host, &self.grammar)?;
        generic.set_userinfo(self.userinfo.as_deref())?;
        generic.set_port(self.port);
        if let Some(path) = &self.path {
            generic.set_path(path)?;
        }

        let mut uri = SmbUri::from_generic(generic, &self.grammar)?;
        if let Some(share) = &self.share {
            uri.set_share(share)?;
        }
        for (param, value) in &self.params {
            uri.set_param(*param, Some(value.as_str()))?;
        }
        Ok(uri)
    }
}
