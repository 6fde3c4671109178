pub mod password;
pub mod token;

pub use password::{Argon2PasswordHasher, PasswordHasher};
pub use token::{Claims, TokenError, TokenIssuer};

use std::fmt;
use std::str::FromStr;

/// Account role carried in session token claims.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Validated identity of the requesting account, extracted from the bearer
/// token at the request boundary and passed explicitly into services.
#[derive(Clone, Debug)]
pub struct CallerIdentity {
    pub user_id: i32,
    pub role: Role,
}
