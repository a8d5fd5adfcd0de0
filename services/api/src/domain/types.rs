use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

/// Verification code length in digits.
pub const CODE_LEN: usize = 6;

/// Verification code time-to-live in minutes. Fixed policy.
pub const CODE_TTL_MINUTES: i64 = 15;

/// What a verification code authorizes once redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    AccountValidation,
    PasswordReset,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountValidation => "account_validation",
            Self::PasswordReset => "password_reset",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "account_validation" => Some(Self::AccountValidation),
            "password_reset" => Some(Self::PasswordReset),
            _ => None,
        }
    }
}

/// User account as the verification flow sees it.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub validated: bool,
    pub created_at: DateTime<Utc>,
}

/// Time-bounded, single-use verification code owned by an account.
///
/// Immutable once created except for `used`, which flips to true exactly
/// once at redemption. The code digits are not unique on their own — only
/// the newest record per (user, purpose) is ever redeemable.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub purpose: Purpose,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Build a fresh code for an account. UUID v7 ids are time-ordered, so
    /// the id doubles as the tie-break when two codes share a `created_at`.
    pub fn issue(user_id: Uuid, purpose: Purpose) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            code: generate_code(),
            purpose,
            used: false,
            created_at: now,
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Uniform random 6-digit code, zero-padded.
fn generate_code() -> String {
    let mut rng = rand::rng();
    let n: u32 = rng.random_range(0..1_000_000);
    format!("{n:06}")
}
