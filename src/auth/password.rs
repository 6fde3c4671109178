use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::SecurityConfig;

/// One-way password hashing seam. Production uses Argon2id; tests can
/// substitute a cheap fake.
///
/// Hashing is CPU-intensive by design. Callers on the async runtime must
/// wrap these in `tokio::task::spawn_blocking`.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String>;

    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hasher with params from [`SecurityConfig`].
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        use argon2::password_hash::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        // The PHC string carries its own salt and params, so verification
        // works across param changes.
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Cheap fake for unit tests. Not a real hash.
#[cfg(test)]
pub struct PlainTextHasher;

#[cfg(test)]
impl PasswordHasher for PlainTextHasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(format!("plain:{plaintext}"))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        hash == format!("plain:{plaintext}")
    }
}
