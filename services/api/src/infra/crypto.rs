use crate::domain::repository::PasswordHasher;
use crate::error::ApiError;

/// bcrypt-backed password hashing.
#[derive(Clone)]
pub struct BcryptHasher {
    pub cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        Ok(bcrypt::hash(plaintext, self.cost).map_err(anyhow::Error::from)?)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}
