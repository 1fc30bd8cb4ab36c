use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::invoice::numbering::{FiscalYear, InvoiceNumber};
use crate::models::invoice::{
    InvoiceHeader, InvoiceItemRow, InvoiceRow, LineItem, StoredInvoice,
};

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Invoice persistence. Carried in `AppState` as `Arc<dyn InvoiceStore>`.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Assigns the next number in the fiscal year containing `today` and
    /// stores the header and items atomically.
    async fn create_invoice(
        &self,
        prefix: &str,
        today: NaiveDate,
        header: &InvoiceHeader,
        items: &[LineItem],
    ) -> Result<StoredInvoice, AppError>;

    /// Looks up an invoice by its exact number. Items come back in entry order.
    async fn find_invoice(&self, invoice_no: &str) -> Result<Option<StoredInvoice>, AppError>;
}

/// Highest sequence among `numbers` in the series, ignoring anything that
/// does not parse as `series_prefix` followed by digits.
pub fn last_sequence<'a>(
    numbers: impl IntoIterator<Item = &'a str>,
    series_prefix: &str,
) -> Option<u32> {
    numbers
        .into_iter()
        .filter_map(|no| InvoiceNumber::sequence_in_series(no, series_prefix))
        .max()
}

// ────────────────────────────────────────────────────────────────────────────
// PgInvoiceStore
// ────────────────────────────────────────────────────────────────────────────

pub struct PgInvoiceStore {
    pool: PgPool,
}

impl PgInvoiceStore {
    pub fn new(pool: PgPool) -> Self {
        PgInvoiceStore { pool }
    }
}

#[async_trait]
impl InvoiceStore for PgInvoiceStore {
    async fn create_invoice(
        &self,
        prefix: &str,
        today: NaiveDate,
        header: &InvoiceHeader,
        items: &[LineItem],
    ) -> Result<StoredInvoice, AppError> {
        let fiscal_year = FiscalYear::containing(today);
        let series = InvoiceNumber::series_prefix(prefix, fiscal_year);

        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        // Blocks other writers until commit; plain reads still proceed.
        sqlx::query("LOCK TABLE invoices IN EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing: Vec<String> =
            sqlx::query_scalar("SELECT invoice_no FROM invoices WHERE left(invoice_no, $2) = $1")
                .bind(&series)
                .bind(series.chars().count() as i32)
                .fetch_all(&mut *tx)
                .await?;
        let number = InvoiceNumber::next_after(
            prefix,
            fiscal_year,
            last_sequence(existing.iter().map(String::as_str), &series),
        );
        let invoice_no = number.to_string();

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO invoices (
                invoice_no, invoice_date, state, state_code, delivery_challan_no,
                delivery_challan_date, transport_mode, vehicle_no, date_of_supply,
                place_of_supply, insurance_policy_no, insurance_policy_date,
                vendor_code, po_no, po_date, invoiced_to_address, invoiced_state,
                invoiced_state_code, invoiced_gstin, consigned_to_address,
                consigned_state, consigned_state_code, consigned_gstin
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                      $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING id
            "#,
        )
        .bind(&invoice_no)
        .bind(&header.invoice_date)
        .bind(&header.state)
        .bind(&header.state_code)
        .bind(&header.delivery_challan_no)
        .bind(&header.delivery_challan_date)
        .bind(&header.transport_mode)
        .bind(&header.vehicle_no)
        .bind(&header.date_of_supply)
        .bind(&header.place_of_supply)
        .bind(&header.insurance_policy_no)
        .bind(&header.insurance_policy_date)
        .bind(&header.vendor_code)
        .bind(&header.po_no)
        .bind(&header.po_date)
        .bind(&header.invoiced_to_address)
        .bind(&header.invoiced_state)
        .bind(&header.invoiced_state_code)
        .bind(&header.invoiced_gstin)
        .bind(&header.consigned_to_address)
        .bind(&header.consigned_state)
        .bind(&header.consigned_state_code)
        .bind(&header.consigned_gstin)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO invoice_items
                    (invoice_id, item_desc, item_hsn, item_qty, item_rate,
                     item_cgst, item_sgst, item_igst)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(id)
            .bind(&item.description)
            .bind(&item.hsn)
            .bind(item.qty)
            .bind(item.rate)
            .bind(item.cgst)
            .bind(item.sgst)
            .bind(item.igst)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id,
            invoice_no = %invoice_no,
            fiscal_year = %number.fiscal_year(),
            sequence = number.sequence(),
            items = items.len(),
            "Invoice created"
        );

        Ok(StoredInvoice {
            id,
            invoice_no,
            header: header.clone(),
            items: items.to_vec(),
        })
    }

    async fn find_invoice(&self, invoice_no: &str) -> Result<Option<StoredInvoice>, AppError> {
        let Some(row) =
            sqlx::query_as::<_, InvoiceRow>("SELECT * FROM invoices WHERE invoice_no = $1")
                .bind(invoice_no)
                .fetch_optional(&self.pool)
                .await?
        else {
            return Ok(None);
        };

        // Casts keep rows written by older FLOAT-typed schemas readable.
        let items = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT item_desc, item_hsn,
                   COALESCE(item_qty::numeric, 0)  AS item_qty,
                   COALESCE(item_rate::numeric, 0) AS item_rate,
                   COALESCE(item_cgst::numeric, 0) AS item_cgst,
                   COALESCE(item_sgst::numeric, 0) AS item_sgst,
                   COALESCE(item_igst::numeric, 0) AS item_igst
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let id = row.id;
        let invoice_no = row.invoice_no.clone();
        Ok(Some(StoredInvoice {
            id,
            invoice_no,
            header: InvoiceHeader::from(row),
            items: items.into_iter().map(LineItem::from).collect(),
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store for tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod memory {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use tokio::sync::Mutex;

    /// Serializes numbering with one mutex, standing in for the table lock.
    /// Writes are staged like a transaction: the header goes in first and a
    /// failure at the item step takes it back out.
    #[derive(Default)]
    pub struct MemoryInvoiceStore {
        invoices: Mutex<Vec<StoredInvoice>>,
        item_failures: AtomicUsize,
    }

    impl MemoryInvoiceStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// A store whose `create_invoice` always fails like a lost connection.
        pub fn failing() -> Self {
            let store = Self::default();
            store.item_failures.store(usize::MAX, Ordering::SeqCst);
            store
        }

        /// Makes the next `create_invoice` fail while writing its items.
        pub fn fail_next_write(&self) {
            self.item_failures.store(1, Ordering::SeqCst);
        }

        fn take_failure(&self) -> bool {
            self.item_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok()
        }

        pub async fn count(&self) -> usize {
            self.invoices.lock().await.len()
        }
    }

    #[async_trait]
    impl InvoiceStore for MemoryInvoiceStore {
        async fn create_invoice(
            &self,
            prefix: &str,
            today: NaiveDate,
            header: &InvoiceHeader,
            items: &[LineItem],
        ) -> Result<StoredInvoice, AppError> {
            let mut invoices = self.invoices.lock().await;
            let fiscal_year = FiscalYear::containing(today);
            let series = InvoiceNumber::series_prefix(prefix, fiscal_year);
            let last = last_sequence(invoices.iter().map(|i| i.invoice_no.as_str()), &series);

            // Let competing tasks run while the lock is held.
            tokio::task::yield_now().await;

            let stored = StoredInvoice {
                id: invoices.len() as i32 + 1,
                invoice_no: InvoiceNumber::next_after(prefix, fiscal_year, last).to_string(),
                header: header.clone(),
                items: items.to_vec(),
            };
            invoices.push(stored.clone());

            if self.take_failure() {
                // Dropped transaction: the header row is rolled back with it.
                invoices.pop();
                return Err(AppError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(stored)
        }

        async fn find_invoice(
            &self,
            invoice_no: &str,
        ) -> Result<Option<StoredInvoice>, AppError> {
            let invoices = self.invoices.lock().await;
            Ok(invoices.iter().find(|i| i.invoice_no == invoice_no).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use rust_decimal_macros::dec;

    use super::memory::MemoryInvoiceStore;
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem {
                description: "Copper wire".to_string(),
                hsn: "7408".to_string(),
                qty: dec!(10),
                rate: dec!(1500),
                cgst: dec!(9),
                sgst: dec!(9),
                igst: dec!(0),
            },
            LineItem {
                description: "Junction box".to_string(),
                hsn: "8538".to_string(),
                qty: dec!(2.5),
                rate: dec!(80),
                cgst: dec!(0),
                sgst: dec!(0),
                igst: dec!(18),
            },
        ]
    }

    #[test]
    fn test_last_sequence_is_numeric() {
        let numbers = ["PTPL/2025-26/999", "PTPL/2025-26/1000", "PTPL/2025-26/998"];
        assert_eq!(last_sequence(numbers, "PTPL/2025-26/"), Some(1000));
    }

    #[test]
    fn test_last_sequence_ignores_other_series() {
        let numbers = ["PTPL/2024-25/120", "PI/2025-26/300", "PTPL/2025-26/abc"];
        assert_eq!(last_sequence(numbers, "PTPL/2025-26/"), None);
    }

    #[tokio::test]
    async fn test_first_invoice_of_year_is_001() {
        let store = MemoryInvoiceStore::new();
        let stored = store
            .create_invoice("PTPL", today(), &InvoiceHeader::default(), &[])
            .await
            .unwrap();
        assert_eq!(stored.invoice_no, "PTPL/2025-26/001");
    }

    #[tokio::test]
    async fn test_new_fiscal_year_restarts_sequence() {
        let store = MemoryInvoiceStore::new();
        let march = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let april = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        let header = InvoiceHeader::default();
        store.create_invoice("PTPL", march, &header, &[]).await.unwrap();
        let second = store.create_invoice("PTPL", march, &header, &[]).await.unwrap();
        let next_year = store.create_invoice("PTPL", april, &header, &[]).await.unwrap();
        assert_eq!(second.invoice_no, "PTPL/2025-26/002");
        assert_eq!(next_year.invoice_no, "PTPL/2026-27/001");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_consecutive_numbers() {
        let store: Arc<dyn InvoiceStore> = Arc::new(MemoryInvoiceStore::new());
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create_invoice("PTPL", today(), &InvoiceHeader::default(), &[])
                        .await
                        .unwrap()
                        .invoice_no
                })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap());
        }
        let unique: HashSet<_> = numbers.iter().cloned().collect();
        assert_eq!(unique.len(), 20);

        let mut sequences: Vec<u32> = numbers
            .iter()
            .map(|n| n.parse::<InvoiceNumber>().unwrap().sequence())
            .collect();
        sequences.sort_unstable();
        assert_eq!(sequences, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_reprint_returns_stored_header_and_items() {
        let store = MemoryInvoiceStore::new();
        let header = InvoiceHeader {
            invoice_date: "2025-07-01".to_string(),
            invoiced_to_address: "Plot 12, MIDC, Bhosari, Pune".to_string(),
            po_no: "PO-7781".to_string(),
            ..Default::default()
        };
        let created = store
            .create_invoice("PTPL", today(), &header, &sample_items())
            .await
            .unwrap();

        let found = store.find_invoice(&created.invoice_no).await.unwrap().unwrap();
        assert_eq!(found.header, header);
        assert_eq!(found.items, sample_items());
        assert!(store.find_invoice("PTPL/2025-26/999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_item_write_rolls_back_header_and_number() {
        let store = MemoryInvoiceStore::new();
        let header = InvoiceHeader::default();
        let first = store
            .create_invoice("PTPL", today(), &header, &sample_items())
            .await
            .unwrap();

        store.fail_next_write();
        let result = store
            .create_invoice("PTPL", today(), &header, &sample_items())
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(store.count().await, 1);
        assert!(store.find_invoice("PTPL/2025-26/002").await.unwrap().is_none());

        // The number of the failed write is reused, not burned.
        let next = store
            .create_invoice("PTPL", today(), &header, &sample_items())
            .await
            .unwrap();
        assert_eq!(first.invoice_no, "PTPL/2025-26/001");
        assert_eq!(next.invoice_no, "PTPL/2025-26/002");
    }

    // Requires running PostgreSQL; set DATABASE_URL and run with --ignored.
    #[tokio::test]
    #[ignore]
    async fn test_pg_concurrent_numbering() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = PgPool::connect(&url).await.unwrap();
        crate::db::init_schema(&pool).await.unwrap();

        let prefix = format!("T{}", chrono::Utc::now().timestamp_micros());
        let store = Arc::new(PgInvoiceStore::new(pool.clone()));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = Arc::clone(&store);
                let prefix = prefix.clone();
                tokio::spawn(async move {
                    store
                        .create_invoice(&prefix, today(), &InvoiceHeader::default(), &sample_items())
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut sequences = Vec::new();
        for handle in handles {
            let stored = handle.await.unwrap();
            sequences.push(stored.invoice_no.parse::<InvoiceNumber>().unwrap().sequence());
        }
        sequences.sort_unstable();
        assert_eq!(sequences, (1..=10).collect::<Vec<_>>());

        let first = format!("{prefix}/2025-26/001");
        let found = store.find_invoice(&first).await.unwrap().unwrap();
        assert_eq!(found.items, sample_items());

        sqlx::query("DELETE FROM invoices WHERE invoice_no LIKE $1")
            .bind(format!("{prefix}/%"))
            .execute(&pool)
            .await
            .unwrap();
    }
}
