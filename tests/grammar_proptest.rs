//! Property-based tests for the SMB URI grammar.
//!
//! These tests generate random valid inputs according to grammar constraints
//! and check that parsing, serialization and mutation behave consistently.

use proptest::prelude::*;

use smb_uri::{
    HostGrammar, InvalidFormatKind, MAX_NETBIOS_NAME_LENGTH, NetbiosParam, SmbUri,
    is_netbios_name,
};

/// Strategies for generating valid grammar-conformant inputs.
mod strategies {
    use super::*;

    const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    const NETBIOS_FIRST: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_";
    const NETBIOS_REST: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789_-";
    const SEGMENT_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789-_.!~*'()$,=+&:@";

    fn chars_from(alphabet: &'static [u8], len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(alphabet.to_vec()), len)
            .prop_map(|v| v.into_iter().map(char::from).collect::<String>())
    }

    /// Generate a DNS hostname whose last label starts with a letter.
    pub fn dns_hostname() -> impl Strategy<Value = String> {
        let label = chars_from(ALPHANUMERIC, 1..=10);
        let top = (prop::sample::select(ALPHA.to_vec()), chars_from(ALPHANUMERIC, 0..=6))
            .prop_map(|(f, rest)| format!("{}{rest}", char::from(f)));
        (prop::collection::vec(label, 0..=3), top).prop_map(|(labels, top)| {
            let mut parts = labels;
            parts.push(top);
            parts.join(".")
        })
    }

    /// Generate a NetBIOS name of `len` characters containing an underscore,
    /// so that it is not also a DNS hostname.
    pub fn netbios_name(len: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
        (
            prop::sample::select(NETBIOS_FIRST.to_vec()),
            chars_from(NETBIOS_REST, len),
        )
            .prop_map(|(f, rest)| {
                let mut name = String::new();
                name.push(char::from(f));
                name.push_str(&rest);
                if !name.contains('_') {
                    name.replace_range(0..1, "_");
                }
                name
            })
    }

    /// Generate an IPv4 address.
    pub fn ipv4() -> impl Strategy<Value = String> {
        (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255)
            .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
    }

    /// Generate any valid SMB host.
    pub fn host() -> impl Strategy<Value = String> {
        prop_oneof![
            6 => dns_hostname(),
            2 => ipv4(),
            2 => netbios_name(1..=(MAX_NETBIOS_NAME_LENGTH - 1)),
        ]
    }

    /// Generate a path segment without `/`.
    pub fn segment() -> impl Strategy<Value = String> {
        chars_from(SEGMENT_CHARS, 1..=12)
    }

    /// Generate a canonical query: a subset of the parameters, in order,
    /// with valid non-empty values.
    pub fn canonical_query() -> impl Strategy<Value = Option<String>> {
        (
            prop::option::of(ipv4()),
            prop::option::of(dns_hostname()),
            prop::option::of(dns_hostname()),
            prop::option::of(dns_hostname()),
            prop::option::of(ipv4()),
            prop::option::of(prop::sample::select(vec!["b", "p", "m", "h", "B", "H"])),
            prop::option::of(chars_from(ALPHANUMERIC, 1..=8)),
        )
            .prop_map(|(nbns, wg, calling, called, bcast, nodetype, scope)| {
                let values = [
                    nbns,
                    wg,
                    calling,
                    called,
                    bcast,
                    nodetype.map(str::to_string),
                    scope,
                ];
                let pairs: Vec<String> = NetbiosParam::ALL
                    .iter()
                    .zip(values)
                    .filter_map(|(p, v)| v.map(|v| format!("{}={v}", p.key())))
                    .collect();
                (!pairs.is_empty()).then(|| pairs.join("&"))
            })
    }

    /// Generate a canonical SMB URI string.
    pub fn smb_uri() -> impl Strategy<Value = String> {
        (
            host(),
            prop::option::of(1u16..=65535),
            prop::collection::vec(segment(), 0..=4),
            canonical_query(),
        )
            .prop_map(|(host, port, segments, query)| {
                let mut uri = format!("smb://{host}");
                if let Some(p) = port.filter(|p| *p != 445) {
                    uri.push_str(&format!(":{p}"));
                }
                for s in segments {
                    uri.push('/');
                    uri.push_str(&s);
                }
                if let Some(q) = query {
                    uri.push('?');
                    uri.push_str(&q);
                }
                uri
            })
    }
}

proptest! {
    #[test]
    fn canonical_uris_round_trip(input in strategies::smb_uri()) {
        let uri = SmbUri::parse(&input).unwrap();
        prop_assert_eq!(uri.to_string(), input);
    }

    #[test]
    fn reparse_is_stable(input in strategies::smb_uri()) {
        let first = SmbUri::parse(&input).unwrap();
        let second = SmbUri::parse(&first.to_string()).unwrap();
        prop_assert_eq!(first.to_string(), second.to_string());
        prop_assert_eq!(first.path(), second.path());
        prop_assert_eq!(first.query(), second.query());
    }

    #[test]
    fn share_is_first_segment(input in strategies::smb_uri()) {
        let uri = SmbUri::parse(&input).unwrap();
        let expected = uri.path().trim_start_matches('/').split('/').next().unwrap_or_default();
        prop_assert_eq!(uri.share(), expected);
    }

    #[test]
    fn aliases_normalize(host in strategies::dns_hostname(), wins in strategies::ipv4(), dom in strategies::dns_hostname()) {
        let uri = SmbUri::parse(&format!("smb://{host}/s?ntdomain={dom}&wins={wins}")).unwrap();
        prop_assert_eq!(uri.to_string(), format!("smb://{host}/s?nbns={wins}&workgroup={dom}"));
    }

    #[test]
    fn share_mutation_preserves_remainder(
        share in strategies::segment(),
        rest in prop::collection::vec(strategies::segment(), 0..=3),
        new_share in strategies::segment(),
    ) {
        let remainder: String = rest.iter().map(|s| format!("/{s}")).collect();
        let mut uri = SmbUri::parse(&format!("smb://server/{share}{remainder}")).unwrap();
        uri.set_share(&new_share).unwrap();
        prop_assert_eq!(uri.path(), format!("/{new_share}{remainder}"));
        prop_assert_eq!(uri.share(), new_share.as_str());
    }

    #[test]
    fn share_with_slash_is_atomic(input in strategies::smb_uri(), a in strategies::segment(), b in strategies::segment()) {
        let mut uri = SmbUri::parse(&input).unwrap();
        let before = uri.to_string();
        let err = uri.set_share(&format!("{a}/{b}")).unwrap_err();
        prop_assert_eq!(err.kind, InvalidFormatKind::ShareContainsSlash);
        prop_assert_eq!(uri.to_string(), before);
    }

    #[test]
    fn netbios_hosts_up_to_fifteen_chars(name in strategies::netbios_name(1..=(MAX_NETBIOS_NAME_LENGTH - 1))) {
        prop_assert!(is_netbios_name(&name));
        let uri = SmbUri::parse(&format!("smb://{name}/share")).unwrap();
        prop_assert!(uri.is_netbios_host());
        let input = format!("smb://{name}/share");
        prop_assert!(SmbUri::parse_with(&input, &HostGrammar::generic()).is_err());
    }

    #[test]
    fn netbios_hosts_over_fifteen_chars_fail(name in strategies::netbios_name(MAX_NETBIOS_NAME_LENGTH..=30)) {
        let err = SmbUri::parse(&format!("smb://{name}/share")).unwrap_err();
        prop_assert!(matches!(err.kind, InvalidFormatKind::InvalidHost(_)), "unexpected error kind");
    }

    #[test]
    fn fragments_always_fail(input in strategies::smb_uri(), frag in "[a-z0-9]{0,8}") {
        let err = SmbUri::parse(&format!("{input}#{frag}")).unwrap_err();
        prop_assert_eq!(err.kind, InvalidFormatKind::FragmentNotAllowed);
    }

    #[test]
    fn unknown_keys_fail(input in strategies::smb_uri(), key in "x[a-z]{1,8}") {
        let sep = if input.contains('?') { '&' } else { '?' };
        let err = SmbUri::parse(&format!("{input}{sep}{key}=1")).unwrap_err();
        prop_assert_eq!(err.kind, InvalidFormatKind::UnknownParams { names: vec![key] });
    }

    #[test]
    fn broadcast_and_scopeid_accept_anything(value in "[ -~]{0,20}") {
        let mut uri = SmbUri::parse("smb://server/share").unwrap();
        uri.set_broadcast(Some(&value));
        uri.set_scopeid(Some(&value));
        prop_assert_eq!(uri.broadcast(), Some(value.as_str()));
        prop_assert_eq!(uri.scopeid(), Some(value.as_str()));
    }
}
