//! Password hashing and verification
//!
//! Passwords are hashed with Argon2id and stored in PHC string format
//! (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<digest>`). The format carries the
//! algorithm, cost parameters and salt, so verification always uses the
//! parameters a record was created with, even after the configured cost
//! changes.
//!
//! Hashing is deliberately slow and runs on the blocking thread pool so it
//! never stalls the async workers.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the hashing engine.
///
/// A verification mismatch is not an error; see [`PasswordService::verify`].
#[derive(Error, Debug)]
pub enum HashingError {
    #[error("Failed to hash password: {0}")]
    Hash(password_hash::Error),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),

    #[error("Failed to verify password: {0}")]
    Verify(password_hash::Error),

    #[error("Hashing worker failed: {0}")]
    Worker(#[source] tokio::task::JoinError),

    #[error("Invalid hashing parameters: {0}")]
    Configuration(argon2::Error),
}

/// Argon2 cost configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Create a new HashingConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ARGON2_MEMORY_KIB`: memory cost in KiB (default: 19456)
    /// - `ARGON2_ITERATIONS`: time cost (default: 2)
    /// - `ARGON2_PARALLELISM`: lanes (default: 1)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = HashingConfig {
            memory_kib: parse_env("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_env("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_env("ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        // Out of range costs fail here rather than on the first request.
        config.params()?;
        Ok(config)
    }

    fn params(&self) -> Result<Params, HashingError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(HashingError::Configuration)
    }
}

fn parse_env(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got {:?}", key, value)),
        Err(_) => Ok(default),
    }
}

/// Hashes new passwords and verifies candidates against stored hashes
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    /// Hash of a throwaway secret, verified when no user record exists so
    /// both rejection paths cost the same.
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Create a new password service with the given cost parameters
    pub fn new(config: &HashingConfig) -> Result<Self, HashingError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.params()?);

        let mut service = Self {
            argon2,
            dummy_hash: Arc::from(""),
        };
        service.dummy_hash = Arc::from(service.hash_blocking("not-a-real-password")?);

        info!(
            memory_kib = config.memory_kib,
            iterations = config.iterations,
            parallelism = config.parallelism,
            "Password service initialized"
        );
        Ok(service)
    }

    /// Hash `password` with a freshly generated salt
    pub async fn hash(&self, password: &str) -> Result<String, HashingError> {
        let service = self.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || service.hash_blocking(&password))
            .await
            .map_err(HashingError::Worker)?
    }

    /// Check `password` against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch. The comparison is constant time inside
    /// the hash engine.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, HashingError> {
        let service = self.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        tokio::task::spawn_blocking(move || service.verify_blocking(&password, &stored_hash))
            .await
            .map_err(HashingError::Worker)?
    }

    /// Burn one verification against the dummy hash; the outcome is ignored
    pub async fn verify_dummy(&self, password: &str) -> Result<(), HashingError> {
        let dummy_hash = Arc::clone(&self.dummy_hash);
        self.verify(password, &dummy_hash).await.map(|_| ())
    }

    fn hash_blocking(&self, password: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut rand::thread_rng());

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(HashingError::Hash)?
            .to_string();

        Ok(hash)
    }

    fn verify_blocking(&self, password: &str, stored_hash: &str) -> Result<bool, HashingError> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(HashingError::MalformedHash)?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => {
                debug!("Password verification mismatch");
                Ok(false)
            }
            Err(e) => Err(HashingError::Verify(e)),
        }
    }
}

#[cfg(test)]
pub(crate) fn fast_config() -> HashingConfig {
    HashingConfig {
        memory_kib: Params::MIN_M_COST,
        iterations: 1,
        parallelism: 1,
    }
}
