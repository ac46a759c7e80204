//! Admin authentication service
//!
//! A single administrator account comes from configuration. Logging in
//! checks the password against an argon2 hash and hands out an HS256 JWT
//! that the admin-only routes accept as a bearer token or session cookie.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How long an admin session lasts
pub const SESSION_TTL_HOURS: i64 = 12;

const TOKEN_TYPE: &str = "admin";

pub struct AuthService {
    admin_user: String,
    password_hash: String,
    jwt_secret: String,
}

impl AuthService {
    /// Build from an already hashed password (argon2 PHC string)
    pub fn from_hash(admin_user: String, password_hash: String, jwt_secret: String) -> Result<Self> {
        PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid admin password hash: {}", e))?;

        Ok(Self {
            admin_user,
            password_hash,
            jwt_secret,
        })
    }

    /// Build from a plain password, hashing it once up front
    pub fn from_password(admin_user: String, password: &str, jwt_secret: String) -> Result<Self> {
        let password_hash = hash_password(password)?;
        Self::from_hash(admin_user, password_hash, jwt_secret)
    }

    pub fn admin_user(&self) -> &str {
        &self.admin_user
    }

    /// Check credentials and issue a session token
    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let parsed_hash = PasswordHash::new(&self.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
        let password_ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();

        if username != self.admin_user || !password_ok {
            anyhow::bail!("Invalid credentials");
        }

        self.generate_token(username)
    }

    /// Returns the username the token was issued to
    pub fn validate_token(&self, token: &str) -> Result<String> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?;

        if token_data.claims.token_type != TOKEN_TYPE || token_data.claims.sub != self.admin_user {
            anyhow::bail!("Token is not an admin session");
        }

        Ok(token_data.claims.sub)
    }

    fn generate_token(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp(),
            iat: now.timestamp(),
            token_type: TOKEN_TYPE.to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .context("Failed to sign session token")
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string())
}

/// Random alphanumeric string for generated secrets and passwords
pub fn random_secret(len: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
    token_type: String,
}
