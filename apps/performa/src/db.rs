use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseSettings;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool> {
    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        "Connecting to PostgreSQL..."
    );

    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.database)
        .username(&settings.user)
        .password(&settings.password);

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const CREATE_INVOICES: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id SERIAL PRIMARY KEY,
    invoice_no VARCHAR(50) UNIQUE NOT NULL,
    invoice_date VARCHAR(50),
    state VARCHAR(50),
    state_code VARCHAR(50),
    delivery_challan_no VARCHAR(50),
    delivery_challan_date VARCHAR(50),
    transport_mode VARCHAR(50),
    vehicle_no VARCHAR(50),
    date_of_supply VARCHAR(50),
    place_of_supply VARCHAR(50),
    insurance_policy_no VARCHAR(50),
    insurance_policy_date VARCHAR(50),
    vendor_code VARCHAR(50),
    po_no VARCHAR(50),
    po_date VARCHAR(50),
    invoiced_to_address TEXT,
    invoiced_state VARCHAR(50),
    invoiced_state_code VARCHAR(50),
    invoiced_gstin VARCHAR(50),
    consigned_to_address TEXT,
    consigned_state VARCHAR(50),
    consigned_state_code VARCHAR(50),
    consigned_gstin VARCHAR(50)
)
"#;

const CREATE_INVOICE_ITEMS: &str = r#"
CREATE TABLE IF NOT EXISTS invoice_items (
    id SERIAL PRIMARY KEY,
    invoice_id INT NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    item_desc TEXT,
    item_hsn VARCHAR(50),
    item_qty NUMERIC NOT NULL DEFAULT 0,
    item_rate NUMERIC NOT NULL DEFAULT 0,
    item_cgst NUMERIC NOT NULL DEFAULT 0,
    item_sgst NUMERIC NOT NULL DEFAULT 0,
    item_igst NUMERIC NOT NULL DEFAULT 0
)
"#;

/// Creates the invoice tables if they do not exist yet. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_INVOICES).execute(pool).await?;
    sqlx::query(CREATE_INVOICE_ITEMS).execute(pool).await?;
    info!("Invoice schema ready");
    Ok(())
}
