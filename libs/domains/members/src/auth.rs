//! Credential hashing and bearer-token issuance.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use core_config::jwt::JwtConfig;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngExt;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MemberError, MemberResult};
use crate::models::Member;

/// Password hashing/verification primitive
#[cfg_attr(test, mockall::automock)]
pub trait PasswordService: Send + Sync {
    fn hash(&self, plaintext: &str) -> MemberResult<String>;
    fn verify(&self, plaintext: &str, hash: &str) -> MemberResult<bool>;
}

/// Argon2-backed implementation with per-hash random salts
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordService;

impl PasswordService for Argon2PasswordService {
    fn hash(&self, plaintext: &str) -> MemberResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| MemberError::PasswordHash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> MemberResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| MemberError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

/// Generate a random alphanumeric password for members onboarded without one
pub fn generate_password(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Claims carried by issued member tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Member id
    pub sub: String,
    pub email: String,
    /// Login name
    pub name: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

/// Signs bearer tokens for an authenticated member
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, member: &Member) -> MemberResult<String>;
}

/// HS256 JWT issuer configured from `JwtConfig`
#[derive(Clone)]
pub struct JwtTokenIssuer {
    config: JwtConfig,
}

impl JwtTokenIssuer {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Verify a token signature and decode its claims
    pub fn decode(&self, token: &str) -> MemberResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| MemberError::Internal(format!("Token validation failed: {e}")))?;

        Ok(token_data.claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, member: &Member) -> MemberResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: member.id.to_string(),
            email: member.email.clone(),
            name: member.user_name.clone(),
            role: member.role.to_string(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            exp: (now + Duration::minutes(self.config.expiry_minutes)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let header = Header {
            alg: Algorithm::HS256,
            ..Default::default()
        };

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| MemberError::Internal(format!("Token signing failed: {e}")))
    }
}
