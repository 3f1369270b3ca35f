//! Password hashing.

use argon2::password_hash::{
    self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use merch_core::{LedgerError, Result};

/// One-way salted password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if hashing fails.
    fn hash(&self, password: &str) -> Result<String>;

    /// Check `password` against a stored `hash`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if the stored hash cannot be parsed.
    fn verify(&self, hash: &str, password: &str) -> Result<bool>;
}

/// Argon2id hasher producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Internal` if the parameters are out of range.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| LedgerError::Internal(format!("invalid argon2 params: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| LedgerError::Internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| LedgerError::Internal(format!("stored password hash is malformed: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LedgerError::Internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }
}
