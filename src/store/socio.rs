use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set};
use serde::Deserialize;

use super::{insertion_order, ClaimStore, PattaStore};
use crate::db::entities::socio_economic;
use crate::domain::{new_id, now_timestamp};
use crate::error::{Result, ServerError};

/// Household survey captured alongside a claim
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocioEconomic {
    pub name: String,
    pub claim_id: String,
    #[serde(default)]
    pub has_pucca_house: bool,
    pub annual_income: f64,
    #[serde(default)]
    pub is_employed_in_govt: bool,
    #[serde(default)]
    pub has_ration_card: bool,
    #[serde(default)]
    pub is_student: bool,
    pub last_exam_percentage: Option<f64>,
    #[serde(default)]
    pub has_other_scholarship: bool,
    pub family_size: Option<i32>,
    pub age: Option<i32>,
}

pub struct SocioEconomicStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SocioEconomicStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Record the survey for an existing claim.
    ///
    /// If the claim already has a patta the new record links to it straight
    /// away.
    pub async fn create(&self, new: NewSocioEconomic) -> Result<socio_economic::Model> {
        if new.name.trim().is_empty() {
            return Err(ServerError::InvalidRequest("name is required".to_string()));
        }
        if !new.annual_income.is_finite() || new.annual_income < 0.0 {
            return Err(ServerError::InvalidRequest(format!(
                "annualIncome must be a non-negative number, got {}",
                new.annual_income
            )));
        }

        let claim = ClaimStore::new(self.db).get(&new.claim_id).await?;
        if self.find_by_claim_ref(&claim.id).await?.is_some() {
            return Err(ServerError::SocioAlreadyExists(claim.id));
        }
        let patta_id = PattaStore::new(self.db)
            .find_by_claim_ref(&claim.id)
            .await?
            .map(|p| p.id);

        let record = socio_economic::ActiveModel {
            id: Set(new_id()),
            name: Set(new.name),
            claim_id: Set(claim.id),
            patta_id: Set(patta_id),
            has_pucca_house: Set(new.has_pucca_house),
            annual_income: Set(new.annual_income),
            is_employed_in_govt: Set(new.is_employed_in_govt),
            has_ration_card: Set(new.has_ration_card),
            is_student: Set(new.is_student),
            last_exam_percentage: Set(new.last_exam_percentage),
            has_other_scholarship: Set(new.has_other_scholarship),
            family_size: Set(new.family_size),
            age: Set(new.age),
            created_at: Set(now_timestamp()),
        }
        .insert(self.db)
        .await?;

        tracing::debug!("Recorded socio-economic survey {} for claim {}", record.id, record.claim_id);
        Ok(record)
    }

    pub async fn find_all(&self) -> Result<Vec<socio_economic::Model>> {
        Ok(socio_economic::Entity::find()
            .order_by(insertion_order("socio_economic"), Order::Asc)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_claim_ref(&self, claim_id: &str) -> Result<Option<socio_economic::Model>> {
        Ok(socio_economic::Entity::find()
            .filter(socio_economic::Column::ClaimId.eq(claim_id))
            .one(self.db)
            .await?)
    }

    pub async fn set_patta_ref(&self, id: &str, patta_id: &str) -> Result<()> {
        let result = socio_economic::Entity::update_many()
            .col_expr(socio_economic::Column::PattaId, Expr::value(patta_id))
            .filter(socio_economic::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ServerError::SocioNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_database;
    use crate::store::fixtures::{pending_claim, survey};

    #[tokio::test]
    async fn test_create_requires_claim() {
        let db = memory_database().await;
        let store = SocioEconomicStore::new(&db);

        let result = store.create(survey("missing")).await;
        assert!(matches!(result, Err(ServerError::ClaimNotFound(_))));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_record_per_claim() {
        let db = memory_database().await;
        pending_claim(&db, "c1", "Raipur", "Kanha").await;
        let store = SocioEconomicStore::new(&db);

        let record = store.create(survey("c1")).await.unwrap();
        assert_eq!(record.patta_id, None);
        assert_eq!(store.find_by_claim_ref("c1").await.unwrap(), Some(record));

        let again = store.create(survey("c1")).await;
        assert!(matches!(again, Err(ServerError::SocioAlreadyExists(id)) if id == "c1"));
    }

    #[tokio::test]
    async fn test_rejects_bad_income() {
        let db = memory_database().await;
        pending_claim(&db, "c1", "Raipur", "Kanha").await;
        let store = SocioEconomicStore::new(&db);

        let negative = NewSocioEconomic {
            annual_income: -5.0,
            ..survey("c1")
        };
        assert!(matches!(store.create(negative).await, Err(ServerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_set_patta_ref() {
        let db = memory_database().await;
        pending_claim(&db, "c1", "Raipur", "Kanha").await;
        let store = SocioEconomicStore::new(&db);
        let record = store.create(survey("c1")).await.unwrap();

        store.set_patta_ref(&record.id, "p1").await.unwrap();
        let updated = store.find_by_claim_ref("c1").await.unwrap().unwrap();
        assert_eq!(updated.patta_id.as_deref(), Some("p1"));

        assert!(matches!(
            store.set_patta_ref("ghost", "p1").await,
            Err(ServerError::SocioNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let db = memory_database().await;
        let store = SocioEconomicStore::new(&db);
        for id in ["c3", "c1", "c2"] {
            pending_claim(&db, id, "Raipur", "Kanha").await;
            store.create(survey(id)).await.unwrap();
        }

        let claims: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.claim_id)
            .collect();
        assert_eq!(claims, vec!["c3", "c1", "c2"]);
    }
}
