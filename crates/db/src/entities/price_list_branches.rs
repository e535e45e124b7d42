//! `SeaORM` Entity for the price_list_branches scope table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "price_list_branches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub price_list_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub branch_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::price_lists::Entity",
        from = "Column::PriceListId",
        to = "super::price_lists::Column::Id"
    )]
    PriceLists,
    #[sea_orm(
        belongs_to = "super::branches::Entity",
        from = "Column::BranchId",
        to = "super::branches::Column::Id"
    )]
    Branches,
}

impl Related<super::price_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceLists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
