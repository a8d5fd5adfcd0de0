#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{Account, Purpose, VerificationCode};
use crate::error::ApiError;

/// Transaction boundary for the stores. Every use case runs its reads and
/// writes against one `Tx`; dropping an uncommitted transaction rolls back.
pub trait TxProvider: Send + Sync {
    type Tx: Send + Sync;

    async fn begin(&self) -> Result<Self::Tx, ApiError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), ApiError>;
    async fn rollback(&self, tx: Self::Tx) -> Result<(), ApiError>;
}

/// Persistence for verification-code records. Pure storage — the state
/// machine (latest-wins, expiry, single use) lives in the use case layer.
pub trait CodeStore<Tx>: Send + Sync {
    async fn create(&self, tx: &Tx, code: &VerificationCode) -> Result<(), ApiError>;

    /// The single most recently created code for (username, purpose),
    /// ordered by `created_at` then `id` descending. Implementations must
    /// lock the returned row until the transaction ends so concurrent
    /// redeems serialize on it.
    async fn find_latest(
        &self,
        tx: &Tx,
        username: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationCode>, ApiError>;

    async fn mark_used(&self, tx: &Tx, id: Uuid) -> Result<(), ApiError>;
}

/// Account reads and the two writes the verification flow guards.
pub trait AccountStore<Tx>: Send + Sync {
    async fn find_by_username(&self, tx: &Tx, username: &str)
    -> Result<Option<Account>, ApiError>;

    async fn find_by_email(&self, tx: &Tx, email: &str) -> Result<Option<Account>, ApiError>;

    async fn find_by_id(&self, tx: &Tx, id: Uuid) -> Result<Option<Account>, ApiError>;

    async fn create(&self, tx: &Tx, account: &Account) -> Result<(), ApiError>;

    async fn set_validated(&self, tx: &Tx, id: Uuid, validated: bool) -> Result<(), ApiError>;

    async fn set_password_hash(&self, tx: &Tx, id: Uuid, hash: &str) -> Result<(), ApiError>;
}

/// Outbound message delivery (email). Failure is a hard issuance failure —
/// no retry or queueing at this layer.
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiError>;
}

/// One-way password hashing with constant-time verification.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, ApiError>;
    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}
