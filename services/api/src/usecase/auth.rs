use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{AccountStore, CodeStore, Notifier, PasswordHasher, TxProvider};
use crate::domain::types::{Account, Purpose};
use crate::error::ApiError;
use crate::usecase::token::issue_access_token;
use crate::usecase::verification::{TxScope, VerificationManager};

// ── SignUp ───────────────────────────────────────────────────────────────────

pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Creates an account and issues its first validation code in one
/// transaction: the account, the code and the mail either all happen or
/// none of them do.
pub struct SignUpUseCase<P, C, A, N, H>
where
    P: TxProvider,
    C: CodeStore<P::Tx>,
    A: AccountStore<P::Tx>,
    N: Notifier,
    H: PasswordHasher,
{
    pub db: P,
    pub accounts: A,
    pub hasher: H,
    pub verification: VerificationManager<P, C, A, N, H>,
}

impl<P, C, A, N, H> SignUpUseCase<P, C, A, N, H>
where
    P: TxProvider,
    C: CodeStore<P::Tx>,
    A: AccountStore<P::Tx>,
    N: Notifier,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: SignUpInput) -> Result<Account, ApiError> {
        if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(ApiError::MissingData);
        }

        let tx = self.db.begin().await?;
        match self.sign_up_in(&tx, input).await {
            Ok(account) => {
                self.db.commit(tx).await?;
                Ok(account)
            }
            Err(e) => {
                let _ = self.db.rollback(tx).await;
                Err(e)
            }
        }
    }

    async fn sign_up_in(&self, tx: &P::Tx, input: SignUpInput) -> Result<Account, ApiError> {
        if self
            .accounts
            .find_by_username(tx, &input.username)
            .await?
            .is_some()
        {
            return Err(ApiError::UsernameTaken);
        }
        if self
            .accounts
            .find_by_email(tx, &input.email)
            .await?
            .is_some()
        {
            return Err(ApiError::EmailTaken);
        }

        let account = Account {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            password_hash: self.hasher.hash(&input.password)?,
            validated: false,
            created_at: Utc::now(),
        };
        self.accounts.create(tx, &account).await?;

        // Joined to the sign-up transaction: a failed mail send unwinds the
        // account creation as well.
        self.verification
            .issue(
                &account.username,
                Purpose::AccountValidation,
                TxScope::Join(tx),
            )
            .await?;

        tracing::info!(username = %account.username, "account created");
        Ok(account)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub account: Account,
    pub access_token: String,
    pub access_token_exp: u64,
}

pub struct LoginUseCase<P, A, H>
where
    P: TxProvider,
    A: AccountStore<P::Tx>,
    H: PasswordHasher,
{
    pub db: P,
    pub accounts: A,
    pub hasher: H,
    pub jwt_secret: String,
}

impl<P, A, H> LoginUseCase<P, A, H>
where
    P: TxProvider,
    A: AccountStore<P::Tx>,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(ApiError::MissingData);
        }

        let tx = self.db.begin().await?;
        let account = self.accounts.find_by_username(&tx, &input.username).await;
        self.db.commit(tx).await?;

        // Unknown username and wrong password collapse into the same error.
        let account = account?.ok_or(ApiError::InvalidCredentials)?;
        if !self.hasher.verify(&input.password, &account.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }
        if !account.validated {
            return Err(ApiError::AccountNotValidated);
        }

        let (access_token, access_token_exp) = issue_access_token(&account, &self.jwt_secret)?;
        Ok(LoginOutput {
            account,
            access_token,
            access_token_exp,
        })
    }
}

// ── GetAccount (for /users/@me) ──────────────────────────────────────────────

pub struct GetAccountUseCase<P, A>
where
    P: TxProvider,
    A: AccountStore<P::Tx>,
{
    pub db: P,
    pub accounts: A,
}

impl<P, A> GetAccountUseCase<P, A>
where
    P: TxProvider,
    A: AccountStore<P::Tx>,
{
    pub async fn execute(&self, id: Uuid) -> Result<Account, ApiError> {
        let tx = self.db.begin().await?;
        let account = self.accounts.find_by_id(&tx, id).await;
        self.db.commit(tx).await?;
        account?.ok_or(ApiError::UserNotFound)
    }
}
