use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::types::Account;
use crate::error::ApiError;

/// Access token lifetime in seconds (30 days, matching the session cookie
/// lifetime of the web client).
pub const ACCESS_TOKEN_EXP: u64 = 30 * 24 * 60 * 60;

/// JWT claims for access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub username: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_access_token(account: &Account, secret: &str) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    let claims = TokenClaims {
        sub: account.id.to_string(),
        username: account.username.clone(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Storage(e.into()))?;
    Ok((token, exp))
}

/// Validate a token and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, ApiError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::InvalidToken)?;

    Ok(data.claims)
}
