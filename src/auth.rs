/// Bearer-token verification
///
/// Session issuance lives in the signup service; this side only needs to
/// turn a bearer token back into the acting account id. A minting helper
/// is kept for tooling and tests.
use crate::error::{AppError, AppResult};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Acting account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verifies access tokens and resolves them to actor ids
#[derive(Clone)]
pub struct Authenticator {
    secret: String,
    token_ttl: i64,
}

impl Authenticator {
    pub fn new(secret: String, token_ttl: i64) -> Self {
        Self { secret, token_ttl }
    }

    /// Issue a token for an account id
    pub fn issue(&self, actor_id: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: actor_id.to_string(),
            iat: now,
            exp: now + self.token_ttl,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verify a token and return the acting account id
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))?;

        Ok(data.claims.sub)
    }
}
