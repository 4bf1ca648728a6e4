//! Credential collaborators: password hashing and access token generation.
//!
//! The marketplace only needs two capabilities, so both sit behind small
//! traits and the facade never names a concrete algorithm.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version,
};
use bazaar_core::{MarketError, MarketResult};
use rand::Rng;

use crate::config::MarketConfig;

/// One-way password digest used at registration and checked at login.
pub trait CredentialHasher: Send + Sync {
    /// Produce a storable digest of `password`.
    fn hash(&self, password: &str) -> MarketResult<String>;

    /// Check `password` against a digest produced by [`CredentialHasher::hash`].
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Source of unpredictable access token strings.
pub trait TokenGenerator: Send + Sync {
    /// Produce a token exactly `len` characters long.
    fn generate(&self, len: usize) -> String;
}

/// Salted Argon2id hashing producing PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with explicit memory (KiB) and iteration costs.
    pub fn new(memory_kib: u32, iterations: u32) -> MarketResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| MarketError::Internal(format!("Invalid hashing parameters: {}", e)))?;
        Ok(Argon2Hasher { params })
    }

    /// Create a hasher from the cost settings in `config`.
    pub fn from_config(config: &MarketConfig) -> MarketResult<Self> {
        Self::new(config.hash_memory_kib, config.hash_iterations)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> MarketResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| MarketError::Internal(format!("Failed to hash password: {}", e)))?;

        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

/// Tokens drawn uniformly from `[0-9a-zA-Z]` using the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericTokens;

impl TokenGenerator for AlphanumericTokens {
    fn generate(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| {
                let idx: u8 = rng.gen_range(0..62);
                match idx {
                    0..=9 => (b'0' + idx) as char,
                    10..=35 => (b'a' + idx - 10) as char,
                    _ => (b'A' + idx - 36) as char,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> Argon2Hasher {
        Argon2Hasher::new(64, 1).unwrap()
    }

    #[test]
    fn test_hash_roundtrip() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("123456").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("123456"));
        assert!(hasher.verify("123456", &hash));
        assert!(!hasher.verify("654321", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap_hasher();
        let a = hasher.hash("123456").unwrap();
        let b = hasher.hash("123456").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("123456", &a));
        assert!(hasher.verify("123456", &b));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!cheap_hasher().verify("123456", "not-a-phc-string"));
        assert!(!cheap_hasher().verify("123456", ""));
    }

    #[test]
    fn test_invalid_params() {
        assert!(matches!(
            Argon2Hasher::new(1, 1),
            Err(MarketError::Internal(_))
        ));
    }

    #[test]
    fn test_tokens_have_requested_length() {
        let tokens = AlphanumericTokens;
        let token = tokens.generate(20);
        assert_eq!(token.len(), 20);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(tokens.generate(64).len(), 64);
    }

    #[test]
    fn test_tokens_differ() {
        let tokens = AlphanumericTokens;
        assert_ne!(tokens.generate(20), tokens.generate(20));
    }
}
