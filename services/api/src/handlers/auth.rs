use axum::{Json, extract::State, http::StatusCode};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::Account;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{
    GetAccountUseCase, LoginInput, LoginUseCase, SignUpInput, SignUpUseCase,
};
use crate::usecase::token::validate_token;

/// Account shape returned to clients. Never includes the password hash.
#[derive(Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub validated: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            validated: account.validated,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let usecase = SignUpUseCase {
        db: state.sea(),
        accounts: state.account_store(),
        hasher: state.hasher(),
        verification: state.verification(),
    };
    let account = usecase
        .execute(SignUpInput {
            username: body.username,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub access_token_exp: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        db: state.sea(),
        accounts: state.account_store(),
        hasher: state.hasher(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        access_token: output.access_token,
        access_token_exp: output.access_token_exp,
    }))
}

pub async fn get_me(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<AccountResponse>, ApiError> {
    let claims = validate_token(auth.token(), &state.jwt_secret)?;
    let id = claims.sub.parse().map_err(|_| ApiError::InvalidToken)?;

    let usecase = GetAccountUseCase {
        db: state.sea(),
        accounts: state.account_store(),
    };
    let account = usecase.execute(id).await?;
    Ok(Json(account.into()))
}
