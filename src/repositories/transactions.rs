use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::models::transactions::TransactionRecord;

/// Keyed store for transaction records, one document per gateway id.
///
/// This core only ever calls `put`, once per created charge. `get` and
/// `update_status` are the contract consumed by the settlement webhook and
/// the status-polling endpoint, which read and mutate records by primary key.
#[automock]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn put(&self, record: &TransactionRecord) -> Result<(), anyhow::Error>;
    async fn get(&self, id: &str) -> Result<Option<TransactionRecord>, anyhow::Error>;
    async fn update_status(&self, id: &str, status: &str) -> Result<(), anyhow::Error>;
}

#[derive(Clone)]
pub struct PostgresTransactionStore {
    conn: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(conn: PgPool) -> Self {
        PostgresTransactionStore { conn }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn put(&self, record: &TransactionRecord) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"INSERT INTO transactions
            (id, status, plan, email, name, price, fbp, fbc, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.id)
        .bind(&record.status)
        .bind(&record.plan)
        .bind(&record.email)
        .bind(&record.name)
        .bind(record.price)
        .bind(&record.fbp)
        .bind(&record.fbc)
        .bind(&record.created_at)
        .execute(&self.conn)
        .await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<TransactionRecord>, anyhow::Error> {
        let record = sqlx::query_as::<_, TransactionRecord>(
            r#"SELECT id, status, plan, email, name, price, fbp, fbc, created_at
            FROM transactions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(record)
    }

    async fn update_status(&self, id: &str, status: &str) -> Result<(), anyhow::Error> {
        sqlx::query("UPDATE transactions SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&self.conn)
            .await?;

        Ok(())
    }
}
