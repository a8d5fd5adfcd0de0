use sea_orm::DatabaseConnection;

use crate::infra::crypto::BcryptHasher;
use crate::infra::db::{DbAccountStore, DbCodeStore, SeaDb};
use crate::infra::mail::SmtpNotifier;
use crate::usecase::verification::VerificationManager;

/// The fully wired verification manager used by every handler.
pub type Verification =
    VerificationManager<SeaDb, DbCodeStore, DbAccountStore, SmtpNotifier, BcryptHasher>;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub notifier: SmtpNotifier,
    pub jwt_secret: String,
}

impl AppState {
    pub fn sea(&self) -> SeaDb {
        SeaDb {
            db: self.db.clone(),
        }
    }

    pub fn account_store(&self) -> DbAccountStore {
        DbAccountStore
    }

    pub fn code_store(&self) -> DbCodeStore {
        DbCodeStore
    }

    pub fn hasher(&self) -> BcryptHasher {
        BcryptHasher::default()
    }

    pub fn verification(&self) -> Verification {
        VerificationManager {
            db: self.sea(),
            codes: self.code_store(),
            accounts: self.account_store(),
            notifier: self.notifier.clone(),
            hasher: self.hasher(),
        }
    }
}
