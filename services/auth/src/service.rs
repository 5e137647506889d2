//! Credential registration and authentication
//!
//! `CredentialService` ties the password hasher to the user repository. Each
//! call is a single stateless transaction against persisted state. Hashing
//! always happens while no pooled connection is held, so slow hashes cannot
//! starve the pool.

use tracing::{error, info, warn};

use crate::{
    error::{CredentialError, CredentialResult, HashingStage},
    models::{Authenticated, Registered},
    password::PasswordService,
    repositories::UserRepository,
    validation::{validate_password, validate_username},
};

/// Registers and authenticates users
#[derive(Clone)]
pub struct CredentialService {
    users: UserRepository,
    passwords: PasswordService,
}

impl CredentialService {
    /// Create a new credential service
    pub fn new(users: UserRepository, passwords: PasswordService) -> Self {
        Self { users, passwords }
    }

    /// Register a new user.
    ///
    /// Uniqueness is left entirely to the storage constraint: there is no
    /// existence check before the insert.
    pub async fn register(&self, username: &str, password: &str) -> CredentialResult<Registered> {
        validate_input(username, password)?;
        info!("Registering user: {}", username);

        let password_hash = self.passwords.hash(password).await.map_err(|e| {
            error!("Password hashing error for {}: {}", username, e);
            CredentialError::Hashing {
                stage: HashingStage::Hash,
                source: e,
            }
        })?;

        match self.users.insert(username, &password_hash).await {
            Ok(()) => {
                info!("User registered: {}", username);
                Ok(Registered {
                    username: username.to_owned(),
                })
            }
            Err(e) if e.is_unique_violation() => {
                warn!("Registration rejected, username already exists: {}", username);
                Err(CredentialError::DuplicateUser)
            }
            Err(e) => {
                error!("Database error while registering {}: {}", username, e);
                Err(CredentialError::Storage(e))
            }
        }
    }

    /// Authenticate a returning user.
    ///
    /// Unknown usernames and wrong passwords produce the same error, and an
    /// unknown username still pays for one verification.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> CredentialResult<Authenticated> {
        validate_input(username, password)?;
        info!("Login attempt for user: {}", username);

        let user = self.users.find_by_username(username).await.map_err(|e| {
            error!("Database error while authenticating {}: {}", username, e);
            CredentialError::Storage(e)
        })?;

        let Some(user) = user else {
            self.passwords.verify_dummy(password).await.map_err(|e| {
                error!("Password comparison error for {}: {}", username, e);
                CredentialError::Hashing {
                    stage: HashingStage::Verify,
                    source: e,
                }
            })?;
            warn!("Invalid credentials for user: {}", username);
            return Err(CredentialError::InvalidCredentials);
        };

        match self.passwords.verify(password, &user.password_hash).await {
            Ok(true) => {
                info!("User authenticated: {}", username);
                Ok(Authenticated {
                    username: user.username,
                })
            }
            Ok(false) => {
                warn!("Invalid credentials for user: {}", username);
                Err(CredentialError::InvalidCredentials)
            }
            Err(e) => {
                error!("Password comparison error for {}: {}", username, e);
                Err(CredentialError::Hashing {
                    stage: HashingStage::Verify,
                    source: e,
                })
            }
        }
    }
}

fn validate_input(username: &str, password: &str) -> CredentialResult<()> {
    validate_username(username)
        .and_then(|_| validate_password(password))
        .map_err(CredentialError::InvalidInput)
}
