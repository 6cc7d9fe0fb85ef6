//! Persistent single-use challenge nonces.
//!
//! Each issued challenge is one row keyed by the wallet's canonical
//! address. Consumption is a single conditional `UPDATE`, so under
//! concurrent submissions of the same challenge exactly one wins and
//! every other attempt observes it as already used.

use sqlx::{Row, SqlitePool};
use walletgate_auth::identity::Address;
use walletgate_auth::ChallengeNonce;

/// Stored state of one issued challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceRecord {
    /// Nonce value as 64 lowercase hex characters.
    pub nonce: String,
    pub created_at: i64,
    pub expires_at: i64,
    /// Set when the challenge was consumed by a successful login.
    pub used_at: Option<i64>,
}

/// Errors from nonce persistence and consumption.
#[derive(Debug, thiserror::Error)]
pub enum NonceStoreError {
    /// No challenge with this value was ever issued for the address.
    #[error("no such challenge")]
    NotFound,
    /// The challenge exists but its validity window has elapsed.
    #[error("challenge expired")]
    Expired,
    /// The challenge was already consumed, possibly by a concurrent
    /// submission that won the race.
    #[error("challenge already used")]
    AlreadyUsed,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// SQLite-backed store of issued challenge nonces.
#[derive(Clone)]
pub struct NonceStore {
    pool: SqlitePool,
    validity_seconds: i64,
}

impl NonceStore {
    /// Create the store, creating its table if needed.
    pub async fn new(pool: SqlitePool, validity_seconds: i64) -> Result<Self, NonceStoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS auth_nonces (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                address TEXT NOT NULL,
                nonce TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL,
                used_at INTEGER
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_auth_nonces_address ON auth_nonces (address, id)",
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            validity_seconds,
        })
    }

    /// Issue a fresh challenge nonce for `address`.
    ///
    /// Earlier outstanding challenges for the same address are left in
    /// place; only the latest one is ever considered by lookups, so
    /// issuing supersedes without deleting.
    pub async fn issue(
        &self,
        address: &Address,
        now: i64,
    ) -> Result<(ChallengeNonce, i64), NonceStoreError> {
        let nonce = ChallengeNonce::new();
        let expires_at = now + self.validity_seconds;

        sqlx::query(
            r#"
            INSERT INTO auth_nonces (address, nonce, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(address.canonical_hex())
        .bind(nonce.to_hex())
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok((nonce, expires_at))
    }

    /// Fetch the most recently issued challenge for `address`,
    /// regardless of whether it has been consumed or expired.
    ///
    /// Callers classify the record themselves: a used row means replay,
    /// an expired row means the window closed. Filtering those out here
    /// would collapse both into "no challenge" and lose the distinction.
    pub async fn latest(&self, address: &Address) -> Result<Option<NonceRecord>, NonceStoreError> {
        let row = sqlx::query(
            r#"
            SELECT nonce, created_at, expires_at, used_at
            FROM auth_nonces
            WHERE address = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(address.canonical_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| NonceRecord {
            nonce: r.get("nonce"),
            created_at: r.get("created_at"),
            expires_at: r.get("expires_at"),
            used_at: r.get("used_at"),
        }))
    }

    /// Consume a challenge atomically.
    ///
    /// A single conditional `UPDATE` marks the row used; the `WHERE`
    /// clause only matches a live, unused row, so two racing
    /// submissions cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no such challenge was issued for this address
    /// - `Expired` if the validity window has elapsed
    /// - `AlreadyUsed` if the challenge was consumed before, including
    ///   by a concurrent submission that won the race
    pub async fn consume(
        &self,
        address: &Address,
        nonce_hex: &str,
        now: i64,
    ) -> Result<(), NonceStoreError> {
        let result = sqlx::query(
            "UPDATE auth_nonces
             SET used_at = ?
             WHERE address = ? AND nonce = ? AND used_at IS NULL AND expires_at > ?",
        )
        .bind(now)
        .bind(address.canonical_hex())
        .bind(nonce_hex)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // The conditional update missed; look the row up to say why.
        let row = sqlx::query(
            r#"
            SELECT expires_at, used_at
            FROM auth_nonces
            WHERE address = ? AND nonce = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(address.canonical_hex())
        .bind(nonce_hex)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Err(NonceStoreError::NotFound),
            Some(r) => {
                let used_at: Option<i64> = r.get("used_at");
                if used_at.is_some() {
                    Err(NonceStoreError::AlreadyUsed)
                } else {
                    Err(NonceStoreError::Expired)
                }
            }
        }
    }

    /// Delete every challenge that can no longer be consumed: expired
    /// or already used.
    ///
    /// Idempotent and safe to run concurrently with issue/consume.
    /// Returns the number of rows removed.
    pub async fn sweep_expired(&self, now: i64) -> Result<u64, NonceStoreError> {
        let result =
            sqlx::query("DELETE FROM auth_nonces WHERE expires_at <= ? OR used_at IS NOT NULL")
                .bind(now)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
