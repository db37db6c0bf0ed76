use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Trust level assigned by an explicit connect action
pub const DEFAULT_TRUST_LEVEL: i32 = 1;

/// Directed assertion that `source` trusts `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEdge {
    pub source: UserId,
    pub target: UserId,
    pub trust_level: i32,
    pub created_at: DateTime<Utc>,
}

impl TrustEdge {
    pub fn new(source: UserId, target: UserId) -> Self {
        Self {
            source,
            target,
            trust_level: DEFAULT_TRUST_LEVEL,
            created_at: Utc::now(),
        }
    }
}

/// Trust relationship between two users, seen from `source`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualStatus {
    /// `source` trusts `target`
    pub outgoing: bool,
    /// `target` trusts `source`
    pub incoming: bool,
    pub mutual: bool,
}

impl MutualStatus {
    pub fn new(outgoing: bool, incoming: bool) -> Self {
        Self {
            outgoing,
            incoming,
            mutual: outgoing && incoming,
        }
    }
}
