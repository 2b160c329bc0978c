use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use super::insertion_order;
use crate::db::entities::claim;
use crate::domain::{new_id, now_timestamp, ClaimStatus, ClaimType};
use crate::error::{Result, ServerError};
use crate::geo::Geometry;

/// Claim submission from a field worker
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClaim {
    pub claimant_name: String,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: ClaimType,
    pub claimed_area: Option<f64>,
    pub created_by: Option<String>,
}

pub struct ClaimStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ClaimStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Register a pending claim without geometry
    pub async fn create(&self, new: NewClaim) -> Result<claim::Model> {
        if new.claimant_name.trim().is_empty() {
            return Err(ServerError::InvalidRequest("claimantName is required".to_string()));
        }
        if let Some(area) = new.claimed_area {
            if !area.is_finite() || area < 0.0 {
                return Err(ServerError::InvalidRequest(format!(
                    "claimedArea must be a non-negative number, got {}",
                    area
                )));
            }
        }

        let claim = claim::ActiveModel {
            id: Set(new_id()),
            claimant_name: Set(new.claimant_name),
            village_name: Set(new.village_name),
            district: Set(new.district),
            state: Set(new.state),
            claim_type: Set(new.claim_type.as_str().to_string()),
            claimed_area: Set(new.claimed_area),
            location: Set(None),
            status: Set(ClaimStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            created_at: Set(now_timestamp()),
        }
        .insert(self.db)
        .await?;

        tracing::info!("Registered claim {} in {}/{}", claim.id, claim.district, claim.village_name);
        Ok(claim)
    }

    pub async fn get(&self, id: &str) -> Result<claim::Model> {
        claim::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServerError::ClaimNotFound(id.to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<claim::Model>> {
        Ok(claim::Entity::find()
            .order_by(insertion_order("claims"), Order::Asc)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<claim::Model>> {
        Ok(claim::Entity::find()
            .filter(claim::Column::Status.eq(status.as_str()))
            .order_by(insertion_order("claims"), Order::Asc)
            .all(self.db)
            .await?)
    }

    /// Record a claim's boundary and move it from `expected` to `status`.
    ///
    /// The write only applies while the claim still holds `expected`, so two
    /// racing allocations cannot both succeed.
    pub async fn update_location(
        &self,
        id: &str,
        geometry: &Geometry,
        status: ClaimStatus,
        expected: ClaimStatus,
    ) -> Result<claim::Model> {
        self.apply_status(id, expected, status, Some(geometry)).await
    }

    /// Move a claim to `to` from whatever status it holds now.
    ///
    /// VERIFIED is only reachable through [`Self::update_location`], so a
    /// verified claim always carries its boundary.
    pub async fn set_status(&self, id: &str, to: ClaimStatus) -> Result<claim::Model> {
        if to == ClaimStatus::Verified {
            return Err(ServerError::InvalidRequest(
                "Claims are verified by allocating a polygon".to_string(),
            ));
        }
        let current = self.get(id).await?;
        let from = current.status().ok_or_else(|| {
            ServerError::InvalidRequest(format!("Claim {} has unknown status '{}'", id, current.status))
        })?;
        self.apply_status(id, from, to, None).await
    }

    async fn apply_status(
        &self,
        id: &str,
        from: ClaimStatus,
        to: ClaimStatus,
        location: Option<&Geometry>,
    ) -> Result<claim::Model> {
        let mut update = claim::Entity::update_many()
            .col_expr(claim::Column::Status, Expr::value(to.as_str()))
            .filter(claim::Column::Id.eq(id))
            .filter(claim::Column::Status.eq(from.as_str()));
        if let Some(geometry) = location {
            update = update.col_expr(claim::Column::Location, Expr::value(geometry.to_json()?));
        }

        // Refused moves never reach the database
        if from.can_transition_to(to) && update.exec(self.db).await?.rows_affected > 0 {
            tracing::debug!("Claim {} moved from {} to {}", id, from, to);
            return self.get(id).await;
        }

        let latest = self.get(id).await?;
        Err(ServerError::InvalidTransition {
            claim_id: id.to_string(),
            from: latest.status().unwrap_or(from),
            to,
        })
    }
}
