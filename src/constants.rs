//! Constants for SMB URI validation.

/// The URI scheme.
pub const SCHEME: &str = "smb";

/// Port used when the URI names none (SMB over TCP).
pub const DEFAULT_PORT: u16 = 445;

/// Minimum length of a NetBIOS-style host name.
pub const MIN_NETBIOS_NAME_LENGTH: usize = 2;

/// Maximum length of a NetBIOS-style host name.
///
/// NetBIOS names are 16 bytes on the wire, the last one being the
/// service suffix, which leaves 15 characters for the name itself.
pub const MAX_NETBIOS_NAME_LENGTH: usize = 15;

/// Accepted NetBIOS node type letters (broadcast, point-to-point, mixed, hybrid).
pub const NODE_TYPES: [char; 4] = ['b', 'p', 'm', 'h'];
