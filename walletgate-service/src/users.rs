//! Wallet-keyed user records.
//!
//! Users are auto-registered on their first successful login: the
//! wallet address is the identity, so there is no separate sign-up
//! step. Later logins only refresh `last_login_at`.

use sqlx::{Row, SqlitePool};
use walletgate_auth::identity::Address;

/// Role granted to a wallet on first login.
pub const DEFAULT_ROLE: &str = "Student";

/// One registered wallet user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Canonical lowercase hex address.
    pub address: String,
    pub role: String,
    pub registered_at: i64,
    pub last_login_at: i64,
}

/// SQLite-backed store of wallet users.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Create the store, creating its table if needed.
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS wallet_users (
                address TEXT PRIMARY KEY,
                role TEXT NOT NULL,
                registered_at INTEGER NOT NULL,
                last_login_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Register the wallet if unseen, then return its record.
    ///
    /// A single upsert keeps first-login registration race-free: two
    /// concurrent first logins both land on the same row, and the
    /// existing role is never overwritten.
    pub async fn ensure_user(&self, address: &Address, now: i64) -> Result<UserRecord, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO wallet_users (address, role, registered_at, last_login_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(address) DO UPDATE SET last_login_at = excluded.last_login_at
            "#,
        )
        .bind(address.canonical_hex())
        .bind(DEFAULT_ROLE)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query(
            "SELECT address, role, registered_at, last_login_at FROM wallet_users WHERE address = ?",
        )
        .bind(address.canonical_hex())
        .fetch_one(&self.pool)
        .await?;

        Ok(UserRecord {
            address: row.get("address"),
            role: row.get("role"),
            registered_at: row.get("registered_at"),
            last_login_at: row.get("last_login_at"),
        })
    }

    /// Look up a user by address.
    pub async fn get(&self, address: &Address) -> Result<Option<UserRecord>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT address, role, registered_at, last_login_at FROM wallet_users WHERE address = ?",
        )
        .bind(address.canonical_hex())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserRecord {
            address: r.get("address"),
            role: r.get("role"),
            registered_at: r.get("registered_at"),
            last_login_at: r.get("last_login_at"),
        }))
    }
}
