//! Turning a drawn boundary into an issued patta.
//!
//! Allocation touches three records: the claim gets its geometry and moves
//! to VERIFIED, a patta is issued with the measured area, and the claim's
//! socio-economic record is pointed at the new patta. All three writes share
//! one transaction, so a caller either sees the full allocation or an error
//! with nothing changed.

use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::db::entities::{claim, patta};
use crate::domain::{patta_number, ClaimStatus};
use crate::error::Result;
use crate::geo::{compute_enclosed_area, validate_ring, Geometry, Position};
use crate::store::{ClaimStore, NewPatta, PattaStore, SocioEconomicStore};

/// Records produced by a successful allocation
#[derive(Debug, Clone)]
pub struct Allocation {
    pub claim: claim::Model,
    pub patta: patta::Model,
}

/// Allocate `ring` to a pending claim, issuing the patta today (UTC).
pub async fn allocate(db: &DatabaseConnection, claim_id: &str, ring: &[Position]) -> Result<Allocation> {
    allocate_on(db, claim_id, ring, Utc::now().date_naive()).await
}

/// Allocate with an explicit issue date
pub async fn allocate_on(
    db: &DatabaseConnection,
    claim_id: &str,
    ring: &[Position],
    issue_date: NaiveDate,
) -> Result<Allocation> {
    let closed = validate_ring(ring)?;
    let granted_area = compute_enclosed_area(&closed)?;
    let geometry = Geometry::polygon(closed);

    let txn = db.begin().await?;
    match write_allocation(&txn, claim_id, &geometry, granted_area, issue_date).await {
        Ok(allocation) => {
            txn.commit().await?;
            tracing::info!(
                "Allocated {} ha to claim {} as patta {}",
                granted_area,
                claim_id,
                allocation.patta.patta_number
            );
            Ok(allocation)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Rollback failed for claim {}: {}", claim_id, rollback_err);
            }
            tracing::warn!("Allocation for claim {} failed: {}", claim_id, e);
            Err(e)
        }
    }
}

async fn write_allocation<C: ConnectionTrait>(
    txn: &C,
    claim_id: &str,
    geometry: &Geometry,
    granted_area: f64,
    issue_date: NaiveDate,
) -> Result<Allocation> {
    let claim = ClaimStore::new(txn)
        .update_location(claim_id, geometry, ClaimStatus::Verified, ClaimStatus::Pending)
        .await?;

    let patta = PattaStore::new(txn)
        .create(NewPatta {
            patta_number: patta_number(&claim.district, &claim.village_name, &claim.id),
            issue_date,
            granted_area,
            claim_id: claim.id.clone(),
        })
        .await?;

    let socio = SocioEconomicStore::new(txn);
    if let Some(record) = socio.find_by_claim_ref(&claim.id).await? {
        socio.set_patta_ref(&record.id, &patta.id).await?;
    }

    Ok(Allocation { claim, patta })
}
