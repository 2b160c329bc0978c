//! Map features for issued pattas.
//!
//! The eligibility lookup walks socio-economic record -> patta -> claim and
//! keeps only chains that end in a drawable polygon. A broken link drops
//! that one record; it never fails the whole lookup.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::db::entities::{claim, patta};
use crate::eligibility::filter_eligible_by_id;
use crate::error::{Result, ServerError};
use crate::geo::{Feature, Geometry};
use crate::store::{ClaimStore, PattaStore, SocioEconomicStore};

/// Popup fields shown for a patta on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PattaProperties {
    pub patta_number: String,
    pub granted_area: f64,
    pub issue_date: String,
    pub claimant_name: String,
    pub village_name: String,
    pub district: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl PattaProperties {
    fn new(patta: &patta::Model, claim: &claim::Model, scheme: Option<String>) -> Self {
        Self {
            patta_number: patta.patta_number.clone(),
            granted_area: patta.granted_area,
            issue_date: patta.issue_date.clone(),
            claimant_name: claim.claimant_name.clone(),
            village_name: claim.village_name.clone(),
            district: claim.district.clone(),
            state: claim.state.clone(),
            scheme,
        }
    }
}

pub type PattaFeature = Feature<PattaProperties>;

/// Pattas whose holders qualify for `scheme_id`, in survey order.
///
/// An unrecognized scheme id matches nothing.
pub async fn lookup_eligible_features<C: ConnectionTrait>(db: &C, scheme_id: &str) -> Result<Vec<PattaFeature>> {
    let records = SocioEconomicStore::new(db).find_all().await?;
    let eligible = filter_eligible_by_id(&records, scheme_id);
    let label = scheme_id.trim().to_uppercase();

    let pattas = PattaStore::new(db);
    let claims = ClaimStore::new(db);
    let mut features = Vec::new();

    for record in &eligible {
        let Some(patta_id) = record.patta_id.as_deref() else {
            continue;
        };

        let patta = match pattas.get(patta_id).await {
            Ok(patta) => patta,
            Err(ServerError::PattaNotFound(_)) => {
                tracing::debug!("Skipping record {}: patta {} is gone", record.id, patta_id);
                continue;
            }
            Err(e) => return Err(e),
        };

        let claim = match claims.get(&patta.claim_id).await {
            Ok(claim) => claim,
            Err(ServerError::ClaimNotFound(_)) => {
                tracing::debug!("Skipping patta {}: claim {} is gone", patta.id, patta.claim_id);
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(geometry) = claim.geometry().filter(Geometry::is_polygon) else {
            tracing::debug!("Skipping claim {}: no polygon boundary", claim.id);
            continue;
        };

        let properties = PattaProperties::new(&patta, &claim, Some(label.clone()));
        features.push(Feature::new(geometry, properties));
    }

    tracing::debug!(
        "Scheme {}: {} of {} records eligible, {} mapped",
        label,
        eligible.len(),
        records.len(),
        features.len()
    );
    Ok(features)
}

/// Every issued patta whose claim has a polygon or multipolygon boundary
pub async fn patta_features<C: ConnectionTrait>(db: &C) -> Result<Vec<PattaFeature>> {
    let joined = PattaStore::new(db).find_all_with_claims().await?;

    Ok(joined
        .into_iter()
        .filter_map(|(patta, claim)| {
            let claim = claim?;
            let geometry = claim.geometry()?;
            Some(Feature::new(geometry, PattaProperties::new(&patta, &claim, None)))
        })
        .collect())
}
