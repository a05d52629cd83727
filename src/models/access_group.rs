//! Cloudflare Access group update body.

use serde::{Deserialize, Serialize};

/// Name given to the synchronized Access group.
pub const GROUP_NAME: &str = "Google";

/// Full replacement body for an Access group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccessGroupUpdate {
    pub name: String,
    /// Include rules. Replaces whatever the group held before.
    pub include: Vec<IncludeRule>,
    pub account_id: String,
}

/// `{ "ip": { "ip": "<cidr>" } }`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IncludeRule {
    pub ip: IpRule,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IpRule {
    pub ip: String,
}

impl IncludeRule {
    pub fn ip(cidr: impl Into<String>) -> IncludeRule {
        IncludeRule {
            ip: IpRule { ip: cidr.into() },
        }
    }
}

impl AccessGroupUpdate {
    /// Build the update for the "Google" group from a list of CIDRs.
    pub fn new(account_id: &str, cidrs: Vec<String>) -> AccessGroupUpdate {
        AccessGroupUpdate {
            name: GROUP_NAME.to_string(),
            include: cidrs.into_iter().map(IncludeRule::ip).collect(),
            account_id: account_id.to_string(),
        }
    }
}
