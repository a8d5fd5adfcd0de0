use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::domain::types::Purpose;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::verification::{RedeemAction, TxScope};

/// `POST /auth/validate/{username}/{code}` — flip the account to validated.
pub async fn validate_account(
    State(state): State<AppState>,
    Path((username, code)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .verification()
        .redeem(&username, &code, RedeemAction::ValidateAccount)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /auth/validate/{username}/resend` — issue a fresh validation code.
/// Responds 202 whether or not the username exists.
pub async fn resend_validation(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .verification()
        .issue(&username, Purpose::AccountValidation, TxScope::Own)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// `POST /auth/forgotten-password/{username}` — issue a password-reset code.
/// Responds 202 whether or not the username exists.
pub async fn forgotten_password(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .verification()
        .issue(&username, Purpose::PasswordReset, TxScope::Own)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// `POST /auth/reset-password/{username}/{code}` — redeem a reset code and
/// replace the stored credential.
pub async fn reset_password(
    State(state): State<AppState>,
    Path((username, code)): Path<(String, String)>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if body.new_password.is_empty() {
        return Err(ApiError::MissingData);
    }
    state
        .verification()
        .redeem(
            &username,
            &code,
            RedeemAction::ResetPassword {
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
