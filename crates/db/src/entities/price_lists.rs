//! `SeaORM` Entity for the price_lists table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "price_lists")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub is_global: bool,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub priority: i32,
    pub allow_non_listed: bool,
    pub warn_non_listed: bool,
    pub apply_all_customer_groups: bool,
    pub apply_all_users: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_list_entries::Entity")]
    PriceListEntries,
    #[sea_orm(has_many = "super::price_list_branches::Entity")]
    PriceListBranches,
    #[sea_orm(has_many = "super::price_list_customer_groups::Entity")]
    PriceListCustomerGroups,
    #[sea_orm(has_many = "super::price_list_users::Entity")]
    PriceListUsers,
}

impl Related<super::price_list_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceListEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
