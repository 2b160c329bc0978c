//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::db::entities::{claim, claim_document, patta, socio_economic};
use crate::eligibility::{eligible_schemes, Scheme};
use crate::geo::Geometry;
use crate::workflow::Allocation;

// ============================================================================
// Request Types
// ============================================================================

/// Query params for claim listing
#[derive(Debug, Deserialize, Default)]
pub struct ClaimListQuery {
    pub status: Option<String>,
}

/// PUT /claims/:id/status request body
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: String,
    pub claimant_name: String,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: String,
    pub claimed_area: Option<f64>,
    pub location: Option<Geometry>,
    pub status: String,
    pub created_by: Option<String>,
    pub created_at: i64,
}

impl From<claim::Model> for ClaimResponse {
    fn from(claim: claim::Model) -> Self {
        let location = claim.geometry();
        Self {
            id: claim.id,
            claimant_name: claim.claimant_name,
            village_name: claim.village_name,
            district: claim.district,
            state: claim.state,
            claim_type: claim.claim_type,
            claimed_area: claim.claimed_area,
            location,
            status: claim.status,
            created_by: claim.created_by,
            created_at: claim.created_at,
        }
    }
}

/// Claim counts per review status
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ClaimSummary {
    pub total: usize,
    pub pending: usize,
    pub verified: usize,
    pub rejected: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaResponse {
    pub id: String,
    pub patta_number: String,
    pub issue_date: String,
    pub granted_area: f64,
    pub claim_id: String,
}

impl From<patta::Model> for PattaResponse {
    fn from(patta: patta::Model) -> Self {
        Self {
            id: patta.id,
            patta_number: patta.patta_number,
            issue_date: patta.issue_date,
            granted_area: patta.granted_area,
            claim_id: patta.claim_id,
        }
    }
}

/// PUT /claims/:id/polygon response
#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub claim: ClaimResponse,
    pub patta: PattaResponse,
}

impl From<Allocation> for AllocationResponse {
    fn from(allocation: Allocation) -> Self {
        Self {
            claim: allocation.claim.into(),
            patta: allocation.patta.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocioEconomicResponse {
    pub id: String,
    pub name: String,
    pub claim_id: String,
    pub patta_id: Option<String>,
    pub has_pucca_house: bool,
    pub annual_income: f64,
    pub is_employed_in_govt: bool,
    pub has_ration_card: bool,
    pub is_student: bool,
    pub last_exam_percentage: Option<f64>,
    pub has_other_scholarship: bool,
    pub family_size: Option<i32>,
    pub age: Option<i32>,
    pub eligible_schemes: Vec<Scheme>,
}

impl From<socio_economic::Model> for SocioEconomicResponse {
    fn from(record: socio_economic::Model) -> Self {
        let eligible_schemes = eligible_schemes(&record);
        Self {
            id: record.id,
            name: record.name,
            claim_id: record.claim_id,
            patta_id: record.patta_id,
            has_pucca_house: record.has_pucca_house,
            annual_income: record.annual_income,
            is_employed_in_govt: record.is_employed_in_govt,
            has_ration_card: record.has_ration_card,
            is_student: record.is_student,
            last_exam_percentage: record.last_exam_percentage,
            has_other_scholarship: record.has_other_scholarship,
            family_size: record.family_size,
            age: record.age,
            eligible_schemes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub claim_id: String,
    pub kind: String,
    pub filename: String,
    pub path: String,
    pub mimetype: String,
    pub size: i64,
    pub created_at: i64,
}

impl From<claim_document::Model> for DocumentResponse {
    fn from(document: claim_document::Model) -> Self {
        Self {
            id: document.id,
            claim_id: document.claim_id,
            kind: document.kind,
            filename: document.filename,
            path: document.path,
            mimetype: document.mimetype,
            size: document.size,
            created_at: document.created_at,
        }
    }
}

/// Entry in the scheme catalogue
#[derive(Debug, Serialize)]
pub struct SchemeInfo {
    pub id: &'static str,
    pub label: &'static str,
}

impl From<Scheme> for SchemeInfo {
    fn from(scheme: Scheme) -> Self {
        Self {
            id: scheme.id(),
            label: scheme.label(),
        }
    }
}
