//! Parser and validator for the `smb://` URI scheme.
//!
//! This crate implements parsing, validation, and serialization of SMB
//! URIs, including the NetBIOS addressing parameters carried in their
//! query. It is an address-format library only: it performs no network
//! I/O and no SMB protocol work.
//!
//! # Overview
//!
//! SMB URIs address shares and files on SMB/CIFS servers. They have the
//! structure:
//!
//! ```text
//! smb://[userinfo@]<host>[:port][/share[/path]][?nbns=..&workgroup=..&...]
//! ```
//!
//! The host may be a DNS hostname, an IP address, or a NetBIOS name of up
//! to 15 characters. The port defaults to 445.
//!
//! # Quick Start
//!
//! ```rust
//! use smb_uri::SmbUri;
//!
//! // Parse an SMB URI
//! let mut uri = SmbUri::parse("smb://fileserver/public/docs?ntdomain=CORP").unwrap();
//!
//! // Access components
//! assert_eq!(uri.host(), "fileserver");
//! assert_eq!(uri.share(), "public");
//! assert_eq!(uri.workgroup(), Some("CORP"));
//! assert_eq!(uri.port(), 445);
//!
//! // Aliases are rewritten to their canonical key
//! assert_eq!(uri.to_string(), "smb://fileserver/public/docs?workgroup=CORP");
//!
//! // Setters validate before committing
//! uri.set_share("private").unwrap();
//! assert!(uri.set_share("not/allowed").is_err());
//! assert_eq!(uri.path(), "/private/docs");
//! ```
//!
//! # Scheme Dispatch
//!
//! [`parse`] accepts any URI and returns a [`Uri`], dispatching through a
//! [`SchemeRegistry`]:
//!
//! ```rust
//! let uri = smb_uri::parse("smb://foo_bar/share").unwrap();
//! assert_eq!(uri.as_smb().map(|u| u.host()), Some("foo_bar"));
//! ```
//!
//! # NetBIOS Parameters
//!
//! | Key | Alias | Validation |
//! |-----|-------|------------|
//! | `nbns` | `wins` | host grammar |
//! | `workgroup` | `ntdomain` | host grammar |
//! | `calling` | | host grammar |
//! | `called` | | host grammar |
//! | `broadcast` | | none |
//! | `nodetype` | | one of `b`, `p`, `m`, `h` |
//! | `scopeid` | | none |
//!
//! Serialization always writes the parameters in the order above and
//! omits empty ones.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod constants;
mod error;
mod generic;
mod host;
mod netbios;
pub mod prelude;
mod registry;
mod smb;

pub use builder::{HasHost, NoHost, SmbUriBuilder};
pub use constants::{
    DEFAULT_PORT, MAX_NETBIOS_NAME_LENGTH, MIN_NETBIOS_NAME_LENGTH, NODE_TYPES, SCHEME,
};
pub use error::{HostError, InvalidFormat, InvalidFormatKind};
pub use generic::GenericUri;
pub use host::{Host, HostGrammar, is_dns_hostname, is_netbios_name};
pub use netbios::{NetbiosParam, NetbiosParams, NodeType};
pub use registry::{SchemeRegistry, Uri, UriScheme, parse};
pub use smb::SmbUri;
