//! `SeaORM` Entity for declarations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "declarations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub period_year: i32,
    pub status: String,
    pub receipt_number: String,
    pub is_rectification: bool,
    pub rectification_count: i32,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_revenue: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_expense: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_finalistica: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub total_apoio: Decimal,
    #[sea_orm(column_type = "JsonBinary")]
    pub snapshot: Json,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub responsible: Option<Json>,
    pub submitted_by: Uuid,
    pub submitted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
