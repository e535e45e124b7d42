//! `SeaORM` Entity for the customer_group_members join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_group_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub customer_group_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub counterparty_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer_groups::Entity",
        from = "Column::CustomerGroupId",
        to = "super::customer_groups::Column::Id"
    )]
    CustomerGroups,
    #[sea_orm(
        belongs_to = "super::counterparties::Entity",
        from = "Column::CounterpartyId",
        to = "super::counterparties::Column::Id"
    )]
    Counterparties,
}

impl Related<super::customer_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerGroups.def()
    }
}

impl Related<super::counterparties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Counterparties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
