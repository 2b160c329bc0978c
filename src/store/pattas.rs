use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set};

use super::insertion_order;
use crate::db::entities::{claim, patta};
use crate::domain::new_id;
use crate::error::{Result, ServerError};

#[derive(Debug, Clone)]
pub struct NewPatta {
    pub patta_number: String,
    pub issue_date: NaiveDate,
    pub granted_area: f64,
    pub claim_id: String,
}

pub struct PattaStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PattaStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewPatta) -> Result<patta::Model> {
        let patta = patta::ActiveModel {
            id: Set(new_id()),
            patta_number: Set(new.patta_number),
            issue_date: Set(new.issue_date.format("%Y-%m-%d").to_string()),
            granted_area: Set(new.granted_area),
            claim_id: Set(new.claim_id),
        }
        .insert(self.db)
        .await?;

        tracing::info!(
            "Issued patta {} ({} ha) for claim {}",
            patta.patta_number,
            patta.granted_area,
            patta.claim_id
        );
        Ok(patta)
    }

    pub async fn get(&self, id: &str) -> Result<patta::Model> {
        patta::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or_else(|| ServerError::PattaNotFound(id.to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<patta::Model>> {
        Ok(patta::Entity::find()
            .order_by(insertion_order("pattas"), Order::Asc)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_claim_ref(&self, claim_id: &str) -> Result<Option<patta::Model>> {
        Ok(patta::Entity::find()
            .filter(patta::Column::ClaimId.eq(claim_id))
            .one(self.db)
            .await?)
    }

    /// Every patta joined with the claim it was issued for
    pub async fn find_all_with_claims(&self) -> Result<Vec<(patta::Model, Option<claim::Model>)>> {
        Ok(patta::Entity::find()
            .find_also_related(claim::Entity)
            .order_by(insertion_order("pattas"), Order::Asc)
            .all(self.db)
            .await?)
    }
}
