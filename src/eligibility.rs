//! Welfare scheme eligibility rules.
//!
//! Each scheme is a fixed predicate over a household's socio-economic
//! record. Rules are evaluated independently, so one record can qualify for
//! several schemes.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::db::entities::socio_economic;

/// Annual household income ceiling for the housing scheme (INR)
pub const HOUSING_INCOME_CEILING: f64 = 300_000.0;

/// Minimum applicant age for housing and rural employment
pub const ADULT_AGE: i32 = 18;

/// Minimum last exam percentage for the scholarship
pub const SCHOLARSHIP_MIN_PERCENTAGE: f64 = 50.0;

/// Welfare schemes with a fixed eligibility predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Pradhan Mantri Awas Yojana
    #[serde(rename = "pmay")]
    Housing,
    /// Mahatma Gandhi National Rural Employment Guarantee
    #[serde(rename = "nrega")]
    RuralEmployment,
    /// Public Distribution System
    #[serde(rename = "pds")]
    PublicDistribution,
    Scholarship,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [
        Scheme::Housing,
        Scheme::RuralEmployment,
        Scheme::PublicDistribution,
        Scheme::Scholarship,
    ];

    /// Identifier used by the map frontend
    pub fn id(&self) -> &'static str {
        match self {
            Scheme::Housing => "pmay",
            Scheme::RuralEmployment => "nrega",
            Scheme::PublicDistribution => "pds",
            Scheme::Scholarship => "scholarship",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scheme::Housing => "PMAY (Pradhan Mantri Awas Yojana)",
            Scheme::RuralEmployment => "MGNREGA (Rural Employment Guarantee)",
            Scheme::PublicDistribution => "PDS (Public Distribution System)",
            Scheme::Scholarship => "Scholarship for Students",
        }
    }

    /// Parse a scheme identifier. Accepts the frontend ids and plain names.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "pmay" | "housing" => Some(Scheme::Housing),
            "nrega" | "mgnrega" | "employment" => Some(Scheme::RuralEmployment),
            "pds" | "ration" => Some(Scheme::PublicDistribution),
            "scholarship" => Some(Scheme::Scholarship),
            _ => None,
        }
    }

    pub fn is_eligible(&self, record: &socio_economic::Model) -> bool {
        match self {
            Scheme::Housing => {
                !record.has_pucca_house
                    && record.annual_income < HOUSING_INCOME_CEILING
                    && is_adult(record)
            }
            Scheme::RuralEmployment => !record.is_employed_in_govt && is_adult(record),
            Scheme::PublicDistribution => record.has_ration_card,
            Scheme::Scholarship => {
                record.is_student
                    && record
                        .last_exam_percentage
                        .is_some_and(|p| p >= SCHOLARSHIP_MIN_PERCENTAGE)
                    && !record.has_other_scholarship
            }
        }
    }
}

// An unknown age never satisfies an age floor
fn is_adult(record: &socio_economic::Model) -> bool {
    record.age.is_some_and(|age| age >= ADULT_AGE)
}

/// Records that satisfy `scheme`, in input order.
pub fn filter_eligible<I, R>(records: I, scheme: Scheme) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Borrow<socio_economic::Model>,
{
    records
        .into_iter()
        .filter(|record| scheme.is_eligible(Borrow::<socio_economic::Model>::borrow(record)))
        .collect()
}

/// Like [`filter_eligible`], but an unrecognized scheme id matches nothing.
pub fn filter_eligible_by_id<I, R>(records: I, scheme_id: &str) -> Vec<R>
where
    I: IntoIterator<Item = R>,
    R: Borrow<socio_economic::Model>,
{
    match Scheme::from_id(scheme_id) {
        Some(scheme) => filter_eligible(records, scheme),
        None => {
            tracing::debug!("Unknown scheme '{}', no records match", scheme_id);
            Vec::new()
        }
    }
}

/// Every scheme the record qualifies for
pub fn eligible_schemes(record: &socio_economic::Model) -> Vec<Scheme> {
    Scheme::ALL
        .into_iter()
        .filter(|scheme| scheme.is_eligible(record))
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str) -> socio_economic::Model {
    socio_economic::Model {
        id: id.to_string(),
        name: format!("Applicant {}", id),
        claim_id: format!("claim-{}", id),
        patta_id: None,
        has_pucca_house: false,
        annual_income: 200_000.0,
        is_employed_in_govt: false,
        has_ration_card: false,
        is_student: false,
        last_exam_percentage: None,
        has_other_scholarship: false,
        family_size: Some(4),
        age: Some(30),
        created_at: 0,
    }
}
