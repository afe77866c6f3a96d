//! Scheme dispatch for URI parsing.
//!
//! A [`SchemeRegistry`] maps scheme names to the types that handle them.
//! Registries are built explicitly and never mutated behind the caller's
//! back; [`parse`] uses a default registry that is built once and holds
//! every scheme this crate implements.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use tracing::trace;

use crate::error::InvalidFormat;
use crate::generic::GenericUri;
use crate::host::HostGrammar;
use crate::smb::SmbUri;

static DEFAULT_REGISTRY: LazyLock<SchemeRegistry> = LazyLock::new(SchemeRegistry::with_defaults);

/// A URI scheme with its own typed components.
///
/// Implementors are built from the generic components produced by the
/// generic URI parser and format back through them.
pub trait UriScheme: Sized + Into<Uri> {
    /// The scheme name, lowercase.
    const NAME: &'static str;

    /// The port implied when the URI names none.
    const DEFAULT_PORT: Option<u16>;

    /// The host grammar used to parse URIs of this scheme.
    fn host_grammar() -> HostGrammar;

    /// Builds the typed value from generic components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the components do not form a valid URI of
    /// this scheme.
    fn decompose(generic: GenericUri, grammar: &HostGrammar) -> Result<Self, InvalidFormat>;

    /// Returns the generic components, kept in sync with the typed ones.
    fn generic(&self) -> &GenericUri;
}

type Constructor = fn(GenericUri, &HostGrammar) -> Result<Uri, InvalidFormat>;

#[derive(Clone, Copy)]
struct SchemeEntry {
    grammar: HostGrammar,
    default_port: Option<u16>,
    construct: Constructor,
}

impl fmt::Debug for SchemeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeEntry")
            .field("grammar", &self.grammar)
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}

/// A table of URI schemes and the types that handle them.
///
/// URIs whose scheme is not registered are parsed as [`Uri::Generic`]
/// using the generic host grammar.
///
/// # Examples
///
/// ```
/// use smb_uri::{SchemeRegistry, SmbUri, Uri};
///
/// let registry = SchemeRegistry::new().with_scheme::<SmbUri>();
/// assert!(registry.contains("smb"));
///
/// let uri = registry.parse("smb://server/share").unwrap();
/// assert!(matches!(uri, Uri::Smb(_)));
///
/// let uri = registry.parse("http://server/page").unwrap();
/// assert!(matches!(uri, Uri::Generic(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemeRegistry {
    schemes: BTreeMap<&'static str, SchemeEntry>,
}

impl SchemeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every scheme this crate implements.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new().with_scheme::<SmbUri>()
    }

    /// Returns the process-wide default registry used by [`parse`].
    #[must_use]
    pub fn global() -> &'static Self {
        &DEFAULT_REGISTRY
    }

    /// Adds a scheme, replacing any earlier entry with the same name.
    #[must_use]
    pub fn with_scheme<S: UriScheme>(mut self) -> Self {
        self.register::<S>();
        self
    }

    /// Adds a scheme, replacing any earlier entry with the same name.
    pub fn register<S: UriScheme>(&mut self) -> &mut Self {
        self.schemes.insert(
            S::NAME,
            SchemeEntry {
                grammar: S::host_grammar(),
                default_port: S::DEFAULT_PORT,
                construct: construct::<S>,
            },
        );
        self
    }

    /// Returns true if `scheme` is registered. The lookup ignores case.
    #[must_use]
    pub fn contains(&self, scheme: &str) -> bool {
        self.schemes.contains_key(scheme.to_ascii_lowercase().as_str())
    }

    /// Returns the registered scheme names, sorted.
    pub fn schemes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemes.keys().copied()
    }

    /// Returns the default port of a registered scheme.
    #[must_use]
    pub fn default_port(&self, scheme: &str) -> Option<u16> {
        self.schemes
            .get(scheme.to_ascii_lowercase().as_str())
            .and_then(|e| e.default_port)
    }

    /// Parses a URI, dispatching on its scheme.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if the URI is malformed, or if its scheme is
    /// registered and the scheme's type rejects it.
    pub fn parse(&self, input: &str) -> Result<Uri, InvalidFormat> {
        let entry = input
            .split_once(':')
            .and_then(|(scheme, _)| self.schemes.get(scheme.to_ascii_lowercase().as_str()))
            .copied();

        match entry {
            Some(entry) => {
                trace!(input, "dispatching to registered scheme");
                let generic = GenericUri::parse(input, &entry.grammar)?;
                (entry.construct)(generic, &entry.grammar)
            }
            None => GenericUri::parse(input, &HostGrammar::generic()).map(Uri::Generic),
        }
    }
}

fn construct<S: UriScheme>(generic: GenericUri, grammar: &HostGrammar) -> Result<Uri, InvalidFormat> {
    S::decompose(generic, grammar).map(Into::into)
}

/// Parses a URI with the default registry.
///
/// # Errors
///
/// Returns `InvalidFormat` if the URI is malformed or is an invalid SMB URI.
///
/// # Examples
///
/// ```
/// let uri = smb_uri::parse("smb://h/s?wins=W&ntdomain=D").unwrap();
/// assert_eq!(uri.to_string(), "smb://h/s?nbns=W&workgroup=D");
/// assert!(uri.as_smb().is_some());
/// ```
pub fn parse(input: &str) -> Result<Uri, InvalidFormat> {
    SchemeRegistry::global().parse(input)
}

/// A parsed URI of any scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Uri {
    /// An `smb://` URI
    Smb(SmbUri),
    /// A URI whose scheme has no registered type
    Generic(GenericUri),
}

impl Uri {
    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.generic().scheme()
    }

    /// Returns the generic components.
    #[must_use]
    pub fn generic(&self) -> &GenericUri {
        match self {
            Self::Smb(uri) => uri.generic(),
            Self::Generic(uri) => uri,
        }
    }

    /// Returns the SMB URI, if this is one.
    #[must_use]
    pub const fn as_smb(&self) -> Option<&SmbUri> {
        match self {
            Self::Smb(uri) => Some(uri),
            Self::Generic(_) => None,
        }
    }

    /// Converts into the SMB URI, if this is one.
    #[must_use]
    pub fn into_smb(self) -> Option<SmbUri> {
        match self {
            Self::Smb(uri) => Some(uri),
            Self::Generic(_) => None,
        }
    }
}

impl From<SmbUri> for Uri {
    fn from(uri: SmbUri) -> Self {
        Self::Smb(uri)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smb(uri) => write!(f, "{uri}"),
            Self::Generic(uri) => write!(f, "{uri}"),
        }
    }
}

impl FromStr for Uri {
    type Err = InvalidFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}
