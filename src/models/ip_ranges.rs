//! Google published IP range document.
//!
//! Mirrors the shape of `goog.json`: a sync token, a creation time and a list
//! of prefixes where every entry normally carries one of `ipv4Prefix` or
//! `ipv6Prefix`. Entries with a null or missing prefix are kept as
//! [`PrefixEntry::Empty`] so one bad entry does not sink the document.

use serde::{Deserialize, Serialize};

/// The IP range document served by gstatic.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpRangeDocument {
    /// Opaque token that changes whenever the list is republished.
    #[serde(default)]
    pub sync_token: String,
    /// Publication timestamp, kept as text.
    #[serde(default)]
    pub creation_time: String,
    /// Published prefixes in document order.
    pub prefixes: Vec<PrefixEntry>,
}

/// One published prefix entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawPrefixEntry", into = "RawPrefixEntry")]
pub enum PrefixEntry {
    Ipv4 { prefix: String },
    Ipv6 { prefix: String },
    /// Both keys set on one entry; each value lands in its own pass.
    DualStack { ipv4: String, ipv6: String },
    /// Neither key carries a value.
    Empty,
}

/// Wire shape of an entry, before it is narrowed into [`PrefixEntry`].
#[derive(Serialize, Deserialize, Default)]
struct RawPrefixEntry {
    #[serde(rename = "ipv4Prefix", default, skip_serializing_if = "Option::is_none")]
    ipv4_prefix: Option<String>,
    #[serde(rename = "ipv6Prefix", default, skip_serializing_if = "Option::is_none")]
    ipv6_prefix: Option<String>,
}

impl From<RawPrefixEntry> for PrefixEntry {
    fn from(raw: RawPrefixEntry) -> Self {
        let ipv4 = raw.ipv4_prefix.filter(|p| !p.is_empty());
        let ipv6 = raw.ipv6_prefix.filter(|p| !p.is_empty());
        match (ipv4, ipv6) {
            (Some(ipv4), Some(ipv6)) => PrefixEntry::DualStack { ipv4, ipv6 },
            (Some(prefix), None) => PrefixEntry::Ipv4 { prefix },
            (None, Some(prefix)) => PrefixEntry::Ipv6 { prefix },
            (None, None) => PrefixEntry::Empty,
        }
    }
}

impl From<PrefixEntry> for RawPrefixEntry {
    fn from(entry: PrefixEntry) -> Self {
        match entry {
            PrefixEntry::Ipv4 { prefix } => RawPrefixEntry {
                ipv4_prefix: Some(prefix),
                ..Default::default()
            },
            PrefixEntry::Ipv6 { prefix } => RawPrefixEntry {
                ipv6_prefix: Some(prefix),
                ..Default::default()
            },
            PrefixEntry::DualStack { ipv4, ipv6 } => RawPrefixEntry {
                ipv4_prefix: Some(ipv4),
                ipv6_prefix: Some(ipv6),
            },
            PrefixEntry::Empty => RawPrefixEntry::default(),
        }
    }
}

impl PrefixEntry {
    pub fn ipv4_prefix(&self) -> Option<&str> {
        match self {
            PrefixEntry::Ipv4 { prefix } => Some(prefix),
            PrefixEntry::DualStack { ipv4, .. } => Some(ipv4),
            PrefixEntry::Ipv6 { .. } | PrefixEntry::Empty => None,
        }
    }

    pub fn ipv6_prefix(&self) -> Option<&str> {
        match self {
            PrefixEntry::Ipv6 { prefix } => Some(prefix),
            PrefixEntry::DualStack { ipv6, .. } => Some(ipv6),
            PrefixEntry::Ipv4 { .. } | PrefixEntry::Empty => None,
        }
    }
}

impl IpRangeDocument {
    /// Flatten the prefixes into a list of CIDR strings.
    ///
    /// All IPv4 prefixes come first, then all IPv6 prefixes, each group in
    /// document order. Empty values are dropped.
    pub fn inclusion_list(&self) -> Vec<String> {
        let ipv4 = self.prefixes.iter().filter_map(PrefixEntry::ipv4_prefix);
        let ipv6 = self.prefixes.iter().filter_map(PrefixEntry::ipv6_prefix);

        ipv4.chain(ipv6)
            .filter(|cidr| !cidr.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn ipv4_count(&self) -> usize {
        self.prefixes
            .iter()
            .filter(|p| p.ipv4_prefix().is_some())
            .count()
    }

    pub fn ipv6_count(&self) -> usize {
        self.prefixes
            .iter()
            .filter(|p| p.ipv6_prefix().is_some())
            .count()
    }
}
