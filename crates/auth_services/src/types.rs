use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller category carried in the token's `role` claim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Platform administrator, may manage any listing
    Admin,
    /// Agency account
    Agency,
    /// Independent escort account
    Escort,
    /// Any other role string (e.g. "client"); has no listing permissions
    Other(String),
}

impl Role {
    /// Returns the role as it appears in the token payload.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Agency => "agency",
            Role::Escort => "escort",
            Role::Other(role) => role,
        }
    }

    /// Whether this role may create, edit, or delete listings at all.
    pub fn can_manage_listings(&self) -> bool {
        matches!(self, Role::Admin | Role::Agency | Role::Escort)
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            "agency" => Role::Agency,
            "escort" => Role::Escort,
            _ => Role::Other(role),
        }
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Role::from(role.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(role) => role,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified caller, decoded from a signed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identifier of the user the token was issued to
    pub id: String,
    /// Role of the user
    pub role: Role,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Whether the caller is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: String,
    /// Role of the user (e.g., "admin", "agency")
    pub role: Role,
    /// Expiration timestamp; tokens without one never expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            id: claims.id,
            role: claims.role,
        }
    }
}

/// Custom error type for authentication-related errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token could not be encoded or decoded
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The requested token lifetime is out of range
    #[error("Invalid token lifetime")]
    InvalidLifetime,
}
