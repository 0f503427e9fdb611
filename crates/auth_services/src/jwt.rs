use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::types::{AuthError, Claims, Identity, Role};

/// Verifies (and, for operators and tests, issues) HMAC-signed bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Creates a new `JwtService` for the shared signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        // `exp` is honoured when present, but not mandatory
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues an HS256 access token for the identity, valid for `ttl`.
    pub fn issue_token(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::InvalidLifetime)?
            .timestamp();

        let claims = Claims {
            id: identity.id.clone(),
            role: identity.role.clone(),
            exp: Some(u64::try_from(expiration).map_err(|_| AuthError::InvalidLifetime)?),
            iat: Some(u64::try_from(now.timestamp()).map_err(|_| AuthError::InvalidLifetime)?),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies a raw token and returns its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Resolves the caller from an `Authorization` header value.
    ///
    /// The token is the second whitespace-separated segment of the header; the
    /// scheme word itself is not checked. Any failure yields `None`.
    pub fn verify_user(&self, authorization: Option<&str>) -> Option<Identity> {
        let token = authorization?.split_whitespace().nth(1)?;

        match self.verify_token(token) {
            Ok(claims) => Some(claims.into()),
            Err(e) => {
                log::debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }

    /// Like [`JwtService::verify_user`], but only admits administrators.
    pub fn verify_admin(&self, authorization: Option<&str>) -> Option<Identity> {
        self.verify_user(authorization)
            .filter(|identity| identity.role == Role::Admin)
    }
}
