//! `SeaORM` Entity for the transfers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub source_branch_id: Uuid,
    pub dest_branch_id: Uuid,
    pub status: TransStatus,
    pub total_value: Decimal,
    pub created_by: Uuid,
    pub transfer_date: Date,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transfer_details::Entity")]
    TransferDetails,
}

impl Related<super::transfer_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransferDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
