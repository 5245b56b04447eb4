//! Signing-token verification for inbound slash commands.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Shared secret configured for the chat workspace.
///
/// Only the SHA-256 digest is kept. Candidates are hashed and compared
/// digest-to-digest without early exit.
#[derive(Clone)]
pub struct SigningKey {
    digest: [u8; 32],
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey").finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("signing key must not be empty".into()));
        }
        Ok(Self {
            digest: Self::hash(secret),
        })
    }

    fn hash(value: &str) -> [u8; 32] {
        Sha256::digest(value.as_bytes()).into()
    }

    /// Verify a candidate token matches
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = Self::hash(candidate);
        candidate
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Verify, returning `Unauthorized` on mismatch
    pub fn authorize(&self, candidate: &str) -> Result<()> {
        if self.verify(candidate) {
            Ok(())
        } else {
            Err(Error::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify() {
        let key = SigningKey::new("xoxb-secret").unwrap();
        assert!(key.verify("xoxb-secret"));
        assert!(!key.verify("xoxb-secreT"));
        assert!(!key.verify(""));
    }

    #[test]
    fn test_authorize_error() {
        let key = SigningKey::new("abc").unwrap();
        assert!(key.authorize("abc").is_ok());
        assert!(matches!(key.authorize("abd"), Err(Error::Unauthorized)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(SigningKey::new("").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = SigningKey::new("hunter2").unwrap();
        assert!(!format!("{:?}", key).contains("hunter2"));
    }
}
