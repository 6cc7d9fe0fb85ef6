//! Login attempt telemetry.
//!
//! Every verification attempt, successful or not, lands one row here
//! with a stable error code and an opaque JSON detail blob. The log is
//! an audit trail: nothing in the login flow reads it back.

use sqlx::{Row, SqlitePool};

/// One recorded login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Canonical address the attempt was for, when it parsed at all.
    pub address: Option<String>,
    pub succeeded: bool,
    /// Stable error code for failed attempts.
    pub error_code: Option<String>,
    /// Opaque JSON detail for offline analysis.
    pub detail: String,
    pub created_at: i64,
}

/// SQLite-backed login attempt log.
#[derive(Clone)]
pub struct AttemptLog {
    pool: SqlitePool,
}

impl AttemptLog {
    /// Create the log, creating its table if needed.
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS auth_attempts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                address TEXT,
                succeeded INTEGER NOT NULL,
                error_code TEXT,
                detail TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Record one attempt.
    pub async fn record(
        &self,
        address: Option<&str>,
        succeeded: bool,
        error_code: Option<&str>,
        detail: &serde_json::Value,
        now: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO auth_attempts (address, succeeded, error_code, detail, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(address)
        .bind(succeeded)
        .bind(error_code)
        .bind(detail.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Attempts for one address, newest first.
    pub async fn for_address(&self, address: &str) -> Result<Vec<AttemptRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT address, succeeded, error_code, detail, created_at
            FROM auth_attempts
            WHERE address = ?
            ORDER BY id DESC
            "#,
        )
        .bind(address)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AttemptRecord {
                address: row.get("address"),
                succeeded: row.get("succeeded"),
                error_code: row.get("error_code"),
                detail: row.get("detail"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
