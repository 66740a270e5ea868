use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwks::JwksCache;

/// Supabase JWT claims.
///
/// The `sub` field is the user's UUID in `auth.users`; `user_metadata`
/// carries profile info from the OAuth provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role (e.g. "authenticated"), not the application role.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.user_metadata
            .as_ref()
            .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
    }

    /// Prefer the top-level email, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }
}

/// How incoming tokens are verified: the project's HS256 secret, or the
/// asymmetric keys published in the project's JWKS.
#[derive(Clone)]
pub enum TokenVerifier {
    Secret(String),
    Jwks(JwksCache),
}

impl TokenVerifier {
    pub async fn validate(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenVerifier::Secret(secret) => validate_token_with_secret(token, secret),
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
        }
    }
}

/// Validate an HS256 token signed with the project JWT secret.
pub fn validate_token_with_secret(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|td| td.claims)
        .map_err(|e| format!("{:?}", e.kind()))
}
