//! Socio-economic survey entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "socio_economic")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub claim_id: String,
    pub patta_id: Option<String>, // set once the claim's patta is issued
    pub has_pucca_house: bool,
    pub annual_income: f64,
    pub is_employed_in_govt: bool,
    pub has_ration_card: bool,
    pub is_student: bool,
    pub last_exam_percentage: Option<f64>,
    pub has_other_scholarship: bool,
    pub family_size: Option<i32>,
    pub age: Option<i32>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::claim::Entity",
        from = "Column::ClaimId",
        to = "super::claim::Column::Id"
    )]
    Claim,
}

impl Related<super::claim::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Claim.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
