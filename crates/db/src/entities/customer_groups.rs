//! `SeaORM` Entity for the customer_groups table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_group_members::Entity")]
    CustomerGroupMembers,
}

impl Related<super::customer_group_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerGroupMembers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
