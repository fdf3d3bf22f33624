use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::Salt;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use argon2::ARGON2ID_IDENT;

use super::errors::PasswordError;
use crate::settings::PasswordSettings;

const SELF_TEST_PROBE: &str = "replay-auth-self-test";

/// Password hashing and verification.
///
/// Produces Argon2id hashes in PHC string format. Verification reads the
/// algorithm, version, cost parameters and salt back out of the stored hash,
/// so hashes made under older cost settings keep verifying.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with configured Argon2id costs.
    ///
    /// # Arguments
    /// * `settings` - Cost parameters; unset values use the argon2 defaults
    ///
    /// # Returns
    /// CredentialHasher instance
    ///
    /// # Errors
    /// * `HashingUnavailable` - Cost parameters are rejected by the backend
    pub fn new(settings: &PasswordSettings) -> Result<Self, PasswordError> {
        let params = Params::new(
            settings.memory_cost_kib.unwrap_or(Params::DEFAULT_M_COST),
            settings.time_cost.unwrap_or(Params::DEFAULT_T_COST),
            settings.parallelism.unwrap_or(Params::DEFAULT_P_COST),
            None,
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Invalid Argon2 parameters");
            PasswordError::HashingUnavailable(format!("invalid Argon2 parameters: {}", e))
        })?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password.
    ///
    /// Every call draws a fresh random salt, so hashing the same password
    /// twice yields two different strings.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingUnavailable` - Random source or hashing backend failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = Self::generate_salt()?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                PasswordError::HashingUnavailable(e.to_string())
            })
    }

    /// Verify a password against a stored hash.
    ///
    /// The output comparison is constant-time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed or uses an unsupported algorithm
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::MalformedHash(format!("Invalid password hash: {}", e)))?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    /// Check whether a stored hash was made with other settings than this hasher's.
    ///
    /// # Arguments
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if the hash should be replaced on the next successful login
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash cannot be parsed
    pub fn needs_rehash(&self, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::MalformedHash(format!("Invalid password hash: {}", e)))?;

        if parsed_hash.algorithm != ARGON2ID_IDENT
            || parsed_hash.version != Some(Version::V0x13 as u32)
        {
            return Ok(true);
        }

        let stored = Params::try_from(&parsed_hash)
            .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        let current = self.argon2.params();

        Ok(stored.m_cost() != current.m_cost()
            || stored.t_cost() != current.t_cost()
            || stored.p_cost() != current.p_cost())
    }

    /// Hash and verify a probe value.
    ///
    /// Run once at startup so a broken backend stops the process instead of
    /// failing every login.
    ///
    /// # Errors
    /// * `HashingUnavailable` - Backend cannot produce verifiable hashes
    pub fn self_test(&self) -> Result<(), PasswordError> {
        let hash = self.hash(SELF_TEST_PROBE)?;

        match self.verify(SELF_TEST_PROBE, &hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::HashingUnavailable(
                "self-test hash did not verify".to_string(),
            )),
            Err(e) => Err(PasswordError::HashingUnavailable(format!(
                "self-test failed: {}",
                e
            ))),
        }
    }

    fn generate_salt() -> Result<SaltString, PasswordError> {
        let mut bytes = [0u8; Salt::RECOMMENDED_LENGTH];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "Random source unavailable");
            PasswordError::HashingUnavailable(format!("random source unavailable: {}", e))
        })?;

        SaltString::encode_b64(&bytes)
            .map_err(|e| PasswordError::HashingUnavailable(e.to_string()))
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
