//! `SeaORM` entity definitions.

pub mod branches;
pub mod counterparties;
pub mod customer_group_members;
pub mod customer_groups;
pub mod document_sequences;
pub mod documents;
pub mod inventory;
pub mod line_items;
pub mod payments;
pub mod price_list_branches;
pub mod price_list_customer_groups;
pub mod price_list_entries;
pub mod price_list_users;
pub mod price_lists;
pub mod products;
pub mod sea_orm_active_enums;
pub mod transfer_details;
pub mod transfers;
pub mod users;
