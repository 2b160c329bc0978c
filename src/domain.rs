//! Claim lifecycle vocabulary shared by the stores, workflows and API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Review status of a claim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimStatus {
    Pending,
    Verified,
    Rejected,
}

impl ClaimStatus {
    #[cfg(test)]
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Pending,
        ClaimStatus::Verified,
        ClaimStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Verified => "VERIFIED",
            ClaimStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Some(ClaimStatus::Pending),
            "VERIFIED" => Some(ClaimStatus::Verified),
            "REJECTED" => Some(ClaimStatus::Rejected),
            _ => None,
        }
    }

    /// Only pending claims move, and only once.
    pub fn can_transition_to(&self, next: ClaimStatus) -> bool {
        matches!(
            (self, next),
            (ClaimStatus::Pending, ClaimStatus::Verified) | (ClaimStatus::Pending, ClaimStatus::Rejected)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forest Rights Act claim categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimType {
    /// Individual Forest Right
    #[serde(rename = "IFR")]
    Individual,
    /// Community Right
    #[serde(rename = "CR")]
    Community,
    /// Community Forest Resource Right
    #[serde(rename = "CFR")]
    CommunityForestResource,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Individual => "IFR",
            ClaimType::Community => "CR",
            ClaimType::CommunityForestResource => "CFR",
        }
    }
}

/// Supporting document slots on a claim
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    IncomeCertificate,
    CasteCertificate,
    IdProof,
    LandDocument,
    Other,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::IncomeCertificate => "incomeCertificate",
            DocumentKind::CasteCertificate => "casteCertificate",
            DocumentKind::IdProof => "idProof",
            DocumentKind::LandDocument => "landDocument",
            DocumentKind::Other => "other",
        }
    }

    /// Slots that hold at most one document; `Other` takes any number.
    pub fn is_single(&self) -> bool {
        !matches!(self, DocumentKind::Other)
    }
}

/// Title number printed on a patta: `<district>-<village>-<claim id>`
pub fn patta_number(district: &str, village_name: &str, claim_id: &str) -> String {
    format!("{}-{}-{}", district, village_name, claim_id)
}

/// Seconds since the unix epoch
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Fresh record identity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
