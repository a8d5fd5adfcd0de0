use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use wordwell_schema::{users, verification_codes};

use crate::domain::repository::{AccountStore, CodeStore, TxProvider};
use crate::domain::types::{Account, Purpose, VerificationCode};
use crate::error::ApiError;

// ── Transaction provider ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct SeaDb {
    pub db: DatabaseConnection,
}

impl TxProvider for SeaDb {
    type Tx = DatabaseTransaction;

    async fn begin(&self) -> Result<DatabaseTransaction, ApiError> {
        Ok(self.db.begin().await.context("begin transaction")?)
    }

    async fn commit(&self, tx: DatabaseTransaction) -> Result<(), ApiError> {
        Ok(tx.commit().await.context("commit transaction")?)
    }

    async fn rollback(&self, tx: DatabaseTransaction) -> Result<(), ApiError> {
        Ok(tx.rollback().await.context("rollback transaction")?)
    }
}

// ── Code store ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCodeStore;

impl CodeStore<DatabaseTransaction> for DbCodeStore {
    async fn create(
        &self,
        tx: &DatabaseTransaction,
        code: &VerificationCode,
    ) -> Result<(), ApiError> {
        verification_codes::ActiveModel {
            id: Set(code.id),
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            purpose: Set(code.purpose.as_str().to_owned()),
            used: Set(code.used),
            created_at: Set(code.created_at),
            expires_at: Set(code.expires_at),
        }
        .insert(tx)
        .await
        .context("create verification code")?;
        Ok(())
    }

    async fn find_latest(
        &self,
        tx: &DatabaseTransaction,
        username: &str,
        purpose: Purpose,
    ) -> Result<Option<VerificationCode>, ApiError> {
        // FOR UPDATE: the winner of two concurrent redeems holds the row
        // until commit; the loser then reads used = true.
        let model = verification_codes::Entity::find()
            .inner_join(users::Entity)
            .filter(users::Column::Username.eq(username))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .order_by_desc(verification_codes::Column::CreatedAt)
            .order_by_desc(verification_codes::Column::Id)
            .lock_exclusive()
            .one(tx)
            .await
            .context("find latest verification code")?;
        model.map(code_from_model).transpose()
    }

    async fn mark_used(&self, tx: &DatabaseTransaction, id: Uuid) -> Result<(), ApiError> {
        verification_codes::ActiveModel {
            id: Set(id),
            used: Set(true),
            ..Default::default()
        }
        .update(tx)
        .await
        .context("mark verification code used")?;
        Ok(())
    }
}

fn code_from_model(model: verification_codes::Model) -> Result<VerificationCode, ApiError> {
    let purpose = Purpose::from_str(&model.purpose)
        .ok_or_else(|| anyhow!("unknown verification purpose {:?}", model.purpose))?;
    Ok(VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        purpose,
        used: model.used,
        created_at: model.created_at,
        expires_at: model.expires_at,
    })
}

// ── Account store ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountStore;

impl AccountStore<DatabaseTransaction> for DbAccountStore {
    async fn find_by_username(
        &self,
        tx: &DatabaseTransaction,
        username: &str,
    ) -> Result<Option<Account>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(tx)
            .await
            .context("find account by username")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_email(
        &self,
        tx: &DatabaseTransaction,
        email: &str,
    ) -> Result<Option<Account>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(tx)
            .await
            .context("find account by email")?;
        Ok(model.map(account_from_model))
    }

    async fn find_by_id(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
    ) -> Result<Option<Account>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(tx)
            .await
            .context("find account by id")?;
        Ok(model.map(account_from_model))
    }

    async fn create(&self, tx: &DatabaseTransaction, account: &Account) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(account.id),
            username: Set(account.username.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            validated: Set(account.validated),
            created_at: Set(account.created_at),
        }
        .insert(tx)
        .await
        .context("create account")?;
        Ok(())
    }

    async fn set_validated(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
        validated: bool,
    ) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            validated: Set(validated),
            ..Default::default()
        }
        .update(tx)
        .await
        .context("set account validated")?;
        Ok(())
    }

    async fn set_password_hash(
        &self,
        tx: &DatabaseTransaction,
        id: Uuid,
        hash: &str,
    ) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(hash.to_owned()),
            ..Default::default()
        }
        .update(tx)
        .await
        .context("set account password hash")?;
        Ok(())
    }
}

fn account_from_model(model: users::Model) -> Account {
    Account {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        validated: model.validated,
        created_at: model.created_at,
    }
}
