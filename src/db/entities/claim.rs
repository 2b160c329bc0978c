//! Claim entity

use sea_orm::entity::prelude::*;

use crate::domain::ClaimStatus;
use crate::geo::Geometry;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "claims")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub claimant_name: String,
    pub village_name: String,
    pub district: String,
    pub state: String,
    pub claim_type: String, // "IFR", "CR", "CFR"
    pub claimed_area: Option<f64>,
    pub location: Option<String>, // GeoJSON geometry
    pub status: String,           // "PENDING", "VERIFIED", "REJECTED"
    pub created_by: Option<String>,
    pub created_at: i64,
}

impl Model {
    pub fn status(&self) -> Option<ClaimStatus> {
        ClaimStatus::parse(&self.status)
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.location.as_deref().and_then(Geometry::from_json)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::patta::Entity")]
    Patta,
    #[sea_orm(has_one = "super::socio_economic::Entity")]
    SocioEconomic,
    #[sea_orm(has_many = "super::claim_document::Entity")]
    Documents,
}

impl Related<super::patta::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patta.def()
    }
}

impl Related<super::socio_economic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocioEconomic.def()
    }
}

impl Related<super::claim_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Documents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
