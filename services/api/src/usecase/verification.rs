use crate::domain::repository::{AccountStore, CodeStore, Notifier, PasswordHasher, TxProvider};
use crate::domain::types::{Purpose, VerificationCode};
use crate::error::ApiError;

/// Whether an operation opens its own transaction or joins one the caller
/// already holds. Joined operations never commit or roll back — the owner
/// finalizes.
pub enum TxScope<'a, Tx> {
    Own,
    Join(&'a Tx),
}

/// The guarded side effect a redemption applies, which also fixes the
/// purpose of the code being redeemed.
pub enum RedeemAction {
    ValidateAccount,
    ResetPassword { new_password: String },
}

impl RedeemAction {
    pub fn purpose(&self) -> Purpose {
        match self {
            Self::ValidateAccount => Purpose::AccountValidation,
            Self::ResetPassword { .. } => Purpose::PasswordReset,
        }
    }
}

/// Issues and redeems single-use verification codes.
///
/// All state lives in the stores; the manager holds no mutable state of its
/// own, so instances are built per request from `AppState`.
pub struct VerificationManager<P, C, A, N, H>
where
    P: TxProvider,
    C: CodeStore<P::Tx>,
    A: AccountStore<P::Tx>,
    N: Notifier,
    H: PasswordHasher,
{
    pub db: P,
    pub codes: C,
    pub accounts: A,
    pub notifier: N,
    pub hasher: H,
}

impl<P, C, A, N, H> VerificationManager<P, C, A, N, H>
where
    P: TxProvider,
    C: CodeStore<P::Tx>,
    A: AccountStore<P::Tx>,
    N: Notifier,
    H: PasswordHasher,
{
    /// Create a code for `username` and mail it.
    ///
    /// An unknown username succeeds with no side effects, so a caller can
    /// never tell "account exists, code sent" from "no such account". Any
    /// downstream failure (store or mailer) fails the whole issuance; with
    /// `TxScope::Own` the transaction is rolled back here, with
    /// `TxScope::Join` the error propagates and the owner rolls back.
    ///
    /// Re-issuing for the same (username, purpose) leaves older codes
    /// untouched — redemption only ever looks at the newest record, which
    /// is what retires them.
    pub async fn issue(
        &self,
        username: &str,
        purpose: Purpose,
        scope: TxScope<'_, P::Tx>,
    ) -> Result<(), ApiError> {
        match scope {
            TxScope::Join(tx) => self.issue_in(tx, username, purpose).await,
            TxScope::Own => {
                let tx = self.db.begin().await?;
                match self.issue_in(&tx, username, purpose).await {
                    Ok(()) => self.db.commit(tx).await,
                    Err(e) => {
                        let _ = self.db.rollback(tx).await;
                        Err(e)
                    }
                }
            }
        }
    }

    async fn issue_in(&self, tx: &P::Tx, username: &str, purpose: Purpose) -> Result<(), ApiError> {
        let Some(account) = self.accounts.find_by_username(tx, username).await? else {
            // Swallowed on purpose: surfacing "user not found" here would
            // let callers enumerate usernames.
            return Ok(());
        };

        let code = VerificationCode::issue(account.id, purpose);
        self.codes.create(tx, &code).await?;

        let (subject, body) = message_for(purpose, &code.code);
        self.notifier.send(&account.email, subject, &body).await?;

        tracing::debug!(username, purpose = purpose.as_str(), "verification code issued");
        Ok(())
    }

    /// Redeem the newest code for `username` and apply the guarded side
    /// effect. Always runs in its own transaction; any failure leaves both
    /// the code and the account untouched.
    pub async fn redeem(
        &self,
        username: &str,
        submitted: &str,
        action: RedeemAction,
    ) -> Result<(), ApiError> {
        let tx = self.db.begin().await?;
        match self.redeem_in(&tx, username, submitted, action).await {
            Ok(()) => self.db.commit(tx).await,
            Err(e) => {
                let _ = self.db.rollback(tx).await;
                Err(e)
            }
        }
    }

    async fn redeem_in(
        &self,
        tx: &P::Tx,
        username: &str,
        submitted: &str,
        action: RedeemAction,
    ) -> Result<(), ApiError> {
        let code = self
            .codes
            .find_latest(tx, username, action.purpose())
            .await?
            .ok_or(ApiError::CodeNotFound)?;

        // Check order matters: a correct-but-used or correct-but-expired
        // code reports its specific cause, and only then does a mismatch
        // read as incorrect. A superseded code therefore always reports
        // CodeIncorrect, never the state of the code it lost to.
        if submitted == code.code && code.used {
            return Err(ApiError::CodeAlreadyUsed);
        }
        if submitted == code.code && code.is_expired() {
            return Err(ApiError::CodeExpired);
        }
        if submitted != code.code {
            return Err(ApiError::CodeIncorrect);
        }

        let account = self
            .accounts
            .find_by_username(tx, username)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        match action {
            RedeemAction::ValidateAccount => {
                self.accounts.set_validated(tx, account.id, true).await?;
            }
            RedeemAction::ResetPassword { new_password } => {
                let hash = self.hasher.hash(&new_password)?;
                self.accounts
                    .set_password_hash(tx, account.id, &hash)
                    .await?;
            }
        }

        self.codes.mark_used(tx, code.id).await?;

        tracing::debug!(username, "verification code redeemed");
        Ok(())
    }
}

/// Mail subject and body for a purpose, with the code embedded.
fn message_for(purpose: Purpose, code: &str) -> (&'static str, String) {
    match purpose {
        Purpose::AccountValidation => (
            "Validate your wordwell account",
            format!("Your account validation code is {code}. It expires in 15 minutes."),
        ),
        Purpose::PasswordReset => (
            "Reset your wordwell password",
            format!("Your password reset code is {code}. It expires in 15 minutes."),
        ),
    }
}
