//! NetBIOS addressing parameters carried in the query of an SMB URI.
//!
//! ```text
//! smb://server/share?nbns=10.0.0.1&workgroup=DOMAIN&nodetype=h
//! ```
//!
//! The query is split on `&` or `;`. Every key must be one of the seven
//! parameters below (or the `wins` / `ntdomain` aliases). The canonical
//! query lists the non-empty parameters in [`NetbiosParam::ALL`] order,
//! joined with `&`.

use std::fmt;
use std::str::FromStr;

use crate::constants::NODE_TYPES;
use crate::error::InvalidFormatKind;
use crate::host::HostGrammar;

/// One of the NetBIOS query parameters of an SMB URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetbiosParam {
    /// NetBIOS name server (WINS) address; alias `wins`
    Nbns,
    /// Workgroup or NT domain name; alias `ntdomain`
    Workgroup,
    /// NetBIOS source name
    Calling,
    /// NetBIOS destination name
    Called,
    /// Broadcast address
    Broadcast,
    /// NetBIOS node type
    NodeType,
    /// NetBIOS scope ID
    ScopeId,
}

impl NetbiosParam {
    /// All parameters, in canonical query order.
    pub const ALL: [Self; 7] = [
        Self::Nbns,
        Self::Workgroup,
        Self::Calling,
        Self::Called,
        Self::Broadcast,
        Self::NodeType,
        Self::ScopeId,
    ];

    /// Returns the canonical query key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Nbns => "nbns",
            Self::Workgroup => "workgroup",
            Self::Calling => "calling",
            Self::Called => "called",
            Self::Broadcast => "broadcast",
            Self::NodeType => "nodetype",
            Self::ScopeId => "scopeid",
        }
    }

    /// Returns the alternative query key, if the parameter has one.
    #[must_use]
    pub const fn alias(self) -> Option<&'static str> {
        match self {
            Self::Nbns => Some("wins"),
            Self::Workgroup => Some("ntdomain"),
            _ => None,
        }
    }

    /// Looks a parameter up by its canonical key or alias.
    ///
    /// # Examples
    ///
    /// ```
    /// use smb_uri::NetbiosParam;
    ///
    /// assert_eq!(NetbiosParam::from_key("wins"), Some(NetbiosParam::Nbns));
    /// assert_eq!(NetbiosParam::from_key("bogus"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == key || p.alias() == Some(key))
    }

    /// Returns a human-readable description used in error messages.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Nbns => "NetBIOS name server (WINS) address",
            Self::Workgroup => "NetBIOS workgroup (or NT domain) name",
            Self::Calling => "NetBIOS calling (source) name",
            Self::Called => "NetBIOS called (destination) name",
            Self::Broadcast => "broadcast address",
            Self::NodeType => "NetBIOS node type",
            Self::ScopeId => "NetBIOS scope ID",
        }
    }

    /// Checks a value for this parameter.
    ///
    /// Empty values always pass. Name parameters must match `grammar`,
    /// the node type must be one of `b`, `p`, `m`, `h` in either case.
    /// `broadcast` and `scopeid` accept anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormatKind::InvalidParam` or
    /// `InvalidFormatKind::InvalidNodeType` when the value is rejected.
    pub fn validate(self, value: &str, grammar: &HostGrammar) -> Result<(), InvalidFormatKind> {
        if value.is_empty() {
            return Ok(());
        }

        match self {
            Self::Nbns | Self::Workgroup | Self::Calling | Self::Called => {
                if grammar.matches(value) {
                    Ok(())
                } else {
                    Err(InvalidFormatKind::InvalidParam {
                        param: self,
                        value: value.to_string(),
                    })
                }
            }
            Self::NodeType => NodeType::from_str(value).map(|_| ()),
            // No grammar is enforced for these two
            Self::Broadcast | Self::ScopeId => Ok(()),
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Nbns => 0,
            Self::Workgroup => 1,
            Self::Calling => 2,
            Self::Called => 3,
            Self::Broadcast => 4,
            Self::NodeType => 5,
            Self::ScopeId => 6,
        }
    }
}

impl fmt::Display for NetbiosParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// NetBIOS node resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// B-node: resolve by broadcast
    Broadcast,
    /// P-node: resolve through the name server only
    PointToPoint,
    /// M-node: broadcast first, then the name server
    Mixed,
    /// H-node: name server first, then broadcast
    Hybrid,
}

impl NodeType {
    /// Returns the lowercase letter used in the query.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Broadcast => NODE_TYPES[0],
            Self::PointToPoint => NODE_TYPES[1],
            Self::Mixed => NODE_TYPES[2],
            Self::Hybrid => NODE_TYPES[3],
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for NodeType {
    type Err = InvalidFormatKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "b" => Ok(Self::Broadcast),
            "p" => Ok(Self::PointToPoint),
            "m" => Ok(Self::Mixed),
            "h" => Ok(Self::Hybrid),
            _ => Err(InvalidFormatKind::InvalidNodeType {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NodeType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NodeType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The NetBIOS parameter values of an SMB URI.
///
/// A value of `Some("")` comes from a `key=` pair; it is kept but never
/// written back to the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NetbiosParams {
    values: [Option<String>; 7],
}

impl NetbiosParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a query into NetBIOS parameters.
    ///
    /// For parameters with an alias, the canonical key is consulted first;
    /// the alias is only consumed when the canonical key is absent or has
    /// no `=value`. Later duplicates of a key replace earlier ones. Every
    /// value is checked with [`NetbiosParam::validate`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormatKind::UnknownParams` listing every key that was
    /// not consumed, or the validation error of the first rejected value.
    ///
    /// # Examples
    ///
    /// ```
    /// use smb_uri::{HostGrammar, NetbiosParam, NetbiosParams};
    ///
    /// let params = NetbiosParams::decompose("ntdomain=DOM;wins=10.0.0.1", &HostGrammar::smb()).unwrap();
    /// assert_eq!(params.get(NetbiosParam::Nbns), Some("10.0.0.1"));
    /// assert_eq!(params.recompose().as_deref(), Some("nbns=10.0.0.1&workgroup=DOM"));
    /// ```
    pub fn decompose(query: &str, grammar: &HostGrammar) -> Result<Self, InvalidFormatKind> {
        let mut pairs: Vec<(&str, Option<&str>)> = Vec::new();
        for segment in query.split(['&', ';']) {
            if segment.is_empty() {
                continue;
            }
            let (name, value) = match segment.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (segment, None),
            };
            match pairs.iter_mut().find(|(n, _)| *n == name) {
                Some(pair) => pair.1 = value,
                None => pairs.push((name, value)),
            }
        }

        let mut params = Self::new();
        for param in NetbiosParam::ALL {
            let value = take(&mut pairs, param.key())
                .or_else(|| param.alias().and_then(|alias| take(&mut pairs, alias)));
            if let Some(value) = value {
                param.validate(value, grammar)?;
                params.values[param.index()] = Some(value.to_string());
            }
        }

        if !pairs.is_empty() {
            return Err(InvalidFormatKind::UnknownParams {
                names: pairs.into_iter().map(|(n, _)| n.to_string()).collect(),
            });
        }

        Ok(params)
    }

    /// Builds the canonical query, or `None` when no parameter has a
    /// non-empty value.
    #[must_use]
    pub fn recompose(&self) -> Option<String> {
        let pairs: Vec<String> = NetbiosParam::ALL
            .into_iter()
            .filter_map(|p| self.get(p).filter(|v| !v.is_empty()).map(|v| format!("{p}={v}")))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("&"))
        }
    }

    /// Returns the value of a parameter, if present.
    #[must_use]
    pub fn get(&self, param: NetbiosParam) -> Option<&str> {
        self.values[param.index()].as_deref()
    }

    /// Returns true if no parameter is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Returns an iterator over the present parameters in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (NetbiosParam, &str)> {
        NetbiosParam::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }

    pub(crate) fn set(&mut self, param: NetbiosParam, value: Option<String>) {
        self.values[param.index()] = value;
    }
}

/// Removes `name` from `pairs`, returning its value if it had one.
fn take<'a>(pairs: &mut Vec<(&'a str, Option<&'a str>)>, name: &str) -> Option<&'a str> {
    let idx = pairs.iter().position(|(n, _)| *n == name)?;
    pairs.remove(idx).1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(query: &str) -> Result<NetbiosParams, InvalidFormatKind> {
        NetbiosParams::decompose(query, &HostGrammar::smb())
    }

    #[test]
    fn decompose_all_params() {
        let params = decompose(
            "nbns=10.0.0.1&workgroup=DOMAIN&calling=src&called=dst&broadcast=10.255.255.255&nodetype=P&scopeid=foo",
        )
        .unwrap();
        assert_eq!(params.get(NetbiosParam::Nbns), Some("10.0.0.1"));
        assert_eq!(params.get(NetbiosParam::Workgroup), Some("DOMAIN"));
        assert_eq!(params.get(NetbiosParam::Calling), Some("src"));
        assert_eq!(params.get(NetbiosParam::Called), Some("dst"));
        assert_eq!(params.get(NetbiosParam::Broadcast), Some("10.255.255.255"));
        assert_eq!(params.get(NetbiosParam::NodeType), Some("P"));
        assert_eq!(params.get(NetbiosParam::ScopeId), Some("foo"));
    }

    #[test]
    fn decompose_aliases() {
        let params = decompose("wins=10.0.0.1&ntdomain=DOMAIN").unwrap();
        assert_eq!(params.get(NetbiosParam::Nbns), Some("10.0.0.1"));
        assert_eq!(params.get(NetbiosParam::Workgroup), Some("DOMAIN"));
    }

    #[test]
    fn canonical_key_shadows_alias() {
        let result = decompose("nbns=10.0.0.1&wins=10.0.0.2");
        assert_eq!(
            result,
            Err(InvalidFormatKind::UnknownParams {
                names: vec!["wins".to_string()]
            })
        );
    }

    #[test]
    fn bare_key_falls_through_to_alias() {
        let params = decompose("nbns&wins=10.0.0.2").unwrap();
        assert_eq!(params.get(NetbiosParam::Nbns), Some("10.0.0.2"));
    }

    #[test]
    fn bare_key_is_consumed_as_absent() {
        let params = decompose("calling").unwrap();
        assert_eq!(params.get(NetbiosParam::Calling), None);
        assert!(params.is_empty());
        assert_eq!(params.recompose(), None);
    }

    #[test]
    fn empty_value_is_kept_but_not_written() {
        let params = decompose("calling=&called=dst").unwrap();
        assert_eq!(params.get(NetbiosParam::Calling), Some(""));
        assert_eq!(params.recompose().as_deref(), Some("called=dst"));
    }

    #[test]
    fn semicolons_and_empty_segments() {
        let params = decompose(";;scopeid=foo;&nodetype=h&").unwrap();
        assert_eq!(params.recompose().as_deref(), Some("nodetype=h&scopeid=foo"));
    }

    #[test]
    fn last_duplicate_wins() {
        let params = decompose("calling=a&calling=b").unwrap();
        assert_eq!(params.get(NetbiosParam::Calling), Some("b"));
    }

    #[test]
    fn unknown_keys_are_listed_in_order() {
        let result = decompose("zeta=1&nbns=10.0.0.1&alpha=2");
        assert_eq!(
            result,
            Err(InvalidFormatKind::UnknownParams {
                names: vec!["zeta".to_string(), "alpha".to_string()]
            })
        );
    }

    #[test]
    fn value_with_equals_sign_splits_on_first() {
        let params = decompose("scopeid=a=b").unwrap();
        assert_eq!(params.get(NetbiosParam::ScopeId), Some("a=b"));
    }

    #[test]
    fn invalid_nodetype_rejected() {
        let result = decompose("nodetype=x");
        assert!(matches!(result, Err(InvalidFormatKind::InvalidNodeType { .. })));
    }

    #[test]
    fn invalid_name_param_rejected() {
        let result = decompose("workgroup=bad%20name");
        assert!(matches!(
            result,
            Err(InvalidFormatKind::InvalidParam {
                param: NetbiosParam::Workgroup,
                ..
            })
        ));
    }

    #[test]
    fn netbios_names_follow_grammar() {
        assert!(NetbiosParam::Calling.validate("my_pc", &HostGrammar::smb()).is_ok());
        assert!(NetbiosParam::Calling.validate("my_pc", &HostGrammar::generic()).is_err());
    }

    #[test]
    fn broadcast_and_scopeid_are_unchecked() {
        let grammar = HostGrammar::smb();
        assert!(NetbiosParam::Broadcast.validate("not an address", &grammar).is_ok());
        assert!(NetbiosParam::ScopeId.validate("any thing", &grammar).is_ok());
    }

    #[test]
    fn node_type_parse() {
        assert_eq!("B".parse::<NodeType>(), Ok(NodeType::Broadcast));
        assert_eq!("p".parse::<NodeType>(), Ok(NodeType::PointToPoint));
        assert_eq!("M".parse::<NodeType>(), Ok(NodeType::Mixed));
        assert_eq!("h".parse::<NodeType>(), Ok(NodeType::Hybrid));
        assert!("hb".parse::<NodeType>().is_err());
        assert_eq!(NodeType::Hybrid.to_string(), "h");
    }

    #[test]
    fn from_key_covers_aliases() {
        assert_eq!(NetbiosParam::from_key("ntdomain"), Some(NetbiosParam::Workgroup));
        assert_eq!(NetbiosParam::from_key("scopeid"), Some(NetbiosParam::ScopeId));
        assert_eq!(NetbiosParam::from_key("NBNS"), None);
    }

    #[test]
    fn iter_in_canonical_order() {
        let params = decompose("scopeid=s&nbns=n").unwrap();
        let items: Vec<_> = params.iter().collect();
        assert_eq!(
            items,
            vec![(NetbiosParam::Nbns, "n"), (NetbiosParam::ScopeId, "s")]
        );
    }
}
