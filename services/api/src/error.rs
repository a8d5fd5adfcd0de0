use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Closed error taxonomy for the wordwell api.
///
/// Business-rule failures carry their own variant so the HTTP layer can map
/// them to precise status codes; infrastructure failures collapse into
/// `Storage` / `Notification` and map to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("user not found")]
    UserNotFound,
    #[error("verification code not found")]
    CodeNotFound,
    #[error("verification code already used")]
    CodeAlreadyUsed,
    #[error("verification code expired")]
    CodeExpired,
    #[error("incorrect verification code")]
    CodeIncorrect,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("account not validated")]
    AccountNotValidated,
    #[error("username already in use")]
    UsernameTaken,
    #[error("email already in use")]
    EmailTaken,
    #[error("missing data")]
    MissingData,
    #[error("mail delivery failed")]
    Notification(#[source] anyhow::Error),
    #[error("internal error")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CodeNotFound => "CODE_NOT_FOUND",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",
            Self::CodeExpired => "CODE_EXPIRED",
            Self::CodeIncorrect => "CODE_INCORRECT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AccountNotValidated => "ACCOUNT_NOT_VALIDATED",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::MissingData => "MISSING_DATA",
            Self::Notification(_) => "NOTIFICATION",
            Self::Storage(_) => "STORAGE",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::UserNotFound | Self::CodeNotFound => StatusCode::NOT_FOUND,
            Self::CodeAlreadyUsed => StatusCode::CONFLICT,
            Self::CodeExpired => StatusCode::GONE,
            Self::CodeIncorrect | Self::InvalidCredentials | Self::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::AccountNotValidated => StatusCode::FORBIDDEN,
            Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
            Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Notification(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        // Infrastructure errors need the anyhow chain logged so the root cause is traceable.
        match &self {
            Self::Notification(e) | Self::Storage(e) => {
                tracing::error!(error = %e, kind = self.kind(), "infrastructure error");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
