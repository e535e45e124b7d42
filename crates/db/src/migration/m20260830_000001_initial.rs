//! Initial schema: catalog, counterparties, price lists, documents,
//! transfers, inventory, and the code sequence table.
//!
//! No database defaults or triggers; all ids and timestamps are set by the
//! application so the SQL stays portable between PostgreSQL and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in INITIAL_SQL.split(';') {
            let statement = statement.trim();
            if !statement.is_empty() {
                db.execute_unprepared(statement).await?;
            }
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in DROP_ORDER {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table}"))
                .await?;
        }
        Ok(())
    }
}

const DROP_ORDER: &[&str] = &[
    "document_sequences",
    "inventory",
    "transfer_details",
    "transfers",
    "payments",
    "line_items",
    "documents",
    "price_list_entries",
    "price_list_users",
    "price_list_customer_groups",
    "price_list_branches",
    "price_lists",
    "customer_group_members",
    "customer_groups",
    "counterparties",
    "products",
    "users",
    "branches",
];

const INITIAL_SQL: &str = r"
CREATE TABLE branches (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE users (
    id UUID PRIMARY KEY,
    display_name VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE products (
    id UUID PRIMARY KEY,
    code VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    base_price DECIMAL(19, 4) NOT NULL,
    category VARCHAR(128),
    active BOOLEAN NOT NULL,
    created_at TIMESTAMP NOT NULL,
    CONSTRAINT chk_products_base_price CHECK (base_price >= 0)
);

CREATE TABLE counterparties (
    id UUID PRIMARY KEY,
    kind VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    total_purchased DECIMAL(19, 4) NOT NULL,
    total_debt DECIMAL(19, 4) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    CONSTRAINT chk_counterparties_kind CHECK (kind IN ('customer', 'supplier'))
);

CREATE TABLE customer_groups (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE customer_group_members (
    customer_group_id UUID NOT NULL REFERENCES customer_groups(id),
    counterparty_id UUID NOT NULL REFERENCES counterparties(id),
    PRIMARY KEY (customer_group_id, counterparty_id)
);

CREATE TABLE price_lists (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL,
    is_global BOOLEAN NOT NULL,
    start_date DATE,
    end_date DATE,
    priority INTEGER NOT NULL,
    allow_non_listed BOOLEAN NOT NULL,
    warn_non_listed BOOLEAN NOT NULL,
    apply_all_customer_groups BOOLEAN NOT NULL,
    apply_all_users BOOLEAN NOT NULL,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE price_list_branches (
    price_list_id UUID NOT NULL REFERENCES price_lists(id),
    branch_id UUID NOT NULL REFERENCES branches(id),
    PRIMARY KEY (price_list_id, branch_id)
);

CREATE TABLE price_list_customer_groups (
    price_list_id UUID NOT NULL REFERENCES price_lists(id),
    customer_group_id UUID NOT NULL REFERENCES customer_groups(id),
    PRIMARY KEY (price_list_id, customer_group_id)
);

CREATE TABLE price_list_users (
    price_list_id UUID NOT NULL REFERENCES price_lists(id),
    user_id UUID NOT NULL REFERENCES users(id),
    PRIMARY KEY (price_list_id, user_id)
);

CREATE TABLE price_list_entries (
    id UUID PRIMARY KEY,
    price_list_id UUID NOT NULL REFERENCES price_lists(id),
    product_id UUID NOT NULL REFERENCES products(id),
    price DECIMAL(19, 4) NOT NULL,
    active BOOLEAN NOT NULL,
    CONSTRAINT uq_price_list_entries UNIQUE (price_list_id, product_id),
    CONSTRAINT chk_price_list_entries_price CHECK (price >= 0)
);

CREATE TABLE documents (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    kind VARCHAR(20) NOT NULL,
    counterparty_id UUID NOT NULL REFERENCES counterparties(id),
    branch_id UUID NOT NULL REFERENCES branches(id),
    created_by UUID NOT NULL REFERENCES users(id),
    document_date DATE NOT NULL,
    discount_amount DECIMAL(19, 4) NOT NULL,
    discount_ratio DECIMAL(7, 4) NOT NULL,
    subtotal DECIMAL(19, 4) NOT NULL,
    discount_total DECIMAL(19, 4) NOT NULL,
    grand_total DECIMAL(19, 4) NOT NULL,
    paid_amount DECIMAL(19, 4) NOT NULL,
    debt_amount DECIMAL(19, 4) NOT NULL,
    status VARCHAR(20) NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    CONSTRAINT chk_documents_kind
        CHECK (kind IN ('sales_order', 'invoice', 'purchase_order')),
    CONSTRAINT chk_documents_status
        CHECK (status IN ('open', 'completed', 'cancelled', 'not_delivered'))
);

CREATE INDEX idx_documents_counterparty ON documents(counterparty_id, status);
CREATE INDEX idx_documents_kind_date ON documents(kind, document_date);

CREATE TABLE line_items (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES documents(id),
    position INTEGER NOT NULL,
    product_id UUID NOT NULL REFERENCES products(id),
    product_code VARCHAR(64) NOT NULL,
    product_name VARCHAR(255) NOT NULL,
    quantity DECIMAL(19, 4) NOT NULL,
    unit_price DECIMAL(19, 4) NOT NULL,
    discount_amount DECIMAL(19, 4) NOT NULL,
    discount_ratio DECIMAL(7, 4) NOT NULL,
    line_total DECIMAL(19, 4) NOT NULL,
    CONSTRAINT chk_line_items_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_line_items_document ON line_items(document_id, position);

CREATE TABLE payments (
    id UUID PRIMARY KEY,
    document_id UUID NOT NULL REFERENCES documents(id),
    amount DECIMAL(19, 4) NOT NULL,
    paid_on DATE NOT NULL,
    method VARCHAR(20) NOT NULL,
    recorded_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMP NOT NULL,
    CONSTRAINT chk_payments_amount CHECK (amount > 0),
    CONSTRAINT chk_payments_method
        CHECK (method IN ('cash', 'bank_transfer', 'card', 'other'))
);

CREATE INDEX idx_payments_document ON payments(document_id);

CREATE TABLE transfers (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    source_branch_id UUID NOT NULL REFERENCES branches(id),
    dest_branch_id UUID NOT NULL REFERENCES branches(id),
    status VARCHAR(20) NOT NULL,
    total_value DECIMAL(19, 4) NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    transfer_date DATE NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    CONSTRAINT chk_transfers_status
        CHECK (status IN ('draft', 'committed', 'cancelled')),
    CONSTRAINT chk_transfers_branches CHECK (source_branch_id <> dest_branch_id)
);

CREATE TABLE transfer_details (
    id UUID PRIMARY KEY,
    transfer_id UUID NOT NULL REFERENCES transfers(id),
    product_id UUID NOT NULL REFERENCES products(id),
    product_code VARCHAR(64) NOT NULL,
    product_name VARCHAR(255) NOT NULL,
    quantity_sent DECIMAL(19, 4) NOT NULL,
    quantity_received DECIMAL(19, 4) NOT NULL,
    send_price DECIMAL(19, 4) NOT NULL,
    receive_price DECIMAL(19, 4) NOT NULL,
    CONSTRAINT chk_transfer_details_sent CHECK (quantity_sent > 0),
    CONSTRAINT chk_transfer_details_received CHECK (quantity_received >= 0)
);

CREATE INDEX idx_transfer_details_transfer ON transfer_details(transfer_id);

CREATE TABLE inventory (
    product_id UUID NOT NULL REFERENCES products(id),
    branch_id UUID NOT NULL REFERENCES branches(id),
    on_hand DECIMAL(19, 4) NOT NULL,
    reserved DECIMAL(19, 4) NOT NULL,
    reorder_level DECIMAL(19, 4) NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    PRIMARY KEY (product_id, branch_id)
);

CREATE TABLE document_sequences (
    doc_type VARCHAR(8) NOT NULL,
    seq_date DATE NOT NULL,
    next_value BIGINT NOT NULL,
    PRIMARY KEY (doc_type, seq_date)
);
";
