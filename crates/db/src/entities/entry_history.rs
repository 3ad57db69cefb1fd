//! `SeaORM` Entity for entry_history table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub account_id: String,
    pub field: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub previous_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub new_value: Decimal,
    pub changed_by: Uuid,
    pub changed_at: DateTimeWithTimeZone,
    pub is_recovery: bool,
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
