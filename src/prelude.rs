//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use smb_uri::prelude::*;
//!
//! let uri = SmbUri::parse("smb://server/share").unwrap();
//! ```
//!
//! Builder state markers (`NoHost`, `HasHost`) are left out.

pub use crate::{
    // Core types
    GenericUri, Host, HostGrammar, NetbiosParam, NetbiosParams, NodeType, SmbUri, Uri,
    // Dispatch
    SchemeRegistry, UriScheme, parse,
    // Builder
    SmbUriBuilder,
    // Errors
    HostError, InvalidFormat, InvalidFormatKind,
    // Constants
    DEFAULT_PORT, MAX_NETBIOS_NAME_LENGTH, MIN_NETBIOS_NAME_LENGTH, SCHEME,
};
