use crate::error::InfraError;
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Keyed one-way transform of `(password, salt)` into the string stored in `accounts.password`.
///
/// HMAC-SHA512 over `password ++ salt`, hex encoded (128 chars). The key is process-wide and
/// fixed at startup.
#[derive(Clone)]
pub struct CredentialHasher {
    mac: HmacSha512,
}

impl CredentialHasher {
    pub fn new(key: &[u8]) -> Result<Self, InfraError> {
        if key.is_empty() {
            return Err(InfraError::HashKey("key is empty".into()));
        }
        let mac = HmacSha512::new_from_slice(key).map_err(|e| InfraError::HashKey(e.to_string()))?;
        Ok(Self { mac })
    }

    pub fn hash(&self, password: &str, salt: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        mac.update(salt.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Compares `password` against a stored hash in constant time.
    pub fn verify(&self, password: &str, salt: &str, stored: &str) -> bool {
        let Ok(expected) = hex::decode(stored) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(password.as_bytes());
        mac.update(salt.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    /// Fresh per-account salt.
    pub fn generate_salt() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialHasher { .. }")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(b"htisthenewac").unwrap()
    }

    #[test]
    fn deterministic() {
        let h = hasher();
        assert_eq!(h.hash("hunter2", "salt-a"), h.hash("hunter2", "salt-a"));
        assert_eq!(h.hash("hunter2", "salt-a").len(), 128);
    }

    #[test]
    fn salt_and_key_change_the_hash() {
        let h = hasher();
        assert_ne!(h.hash("hunter2", "salt-a"), h.hash("hunter2", "salt-b"));

        let other = CredentialHasher::new(b"another key").unwrap();
        assert_ne!(h.hash("hunter2", "salt-a"), other.hash("hunter2", "salt-a"));
    }

    #[test]
    fn hashes_the_concatenation() {
        let h = hasher();
        assert_eq!(h.hash("abc", "def"), h.hash("ab", "cdef"));
    }

    #[test]
    fn matches_reference_vector() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let h = CredentialHasher::new(b"Jefe").unwrap();
        assert_eq!(
            h.hash("what do ya want ", "for nothing?"),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea2505549758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn verify() {
        let h = hasher();
        let salt = CredentialHasher::generate_salt();
        let stored = h.hash("hunter2", &salt);

        assert!(h.verify("hunter2", &salt, &stored));
        assert!(!h.verify("hunter3", &salt, &stored));
        assert!(!h.verify("hunter2", "other", &stored));
        assert!(!h.verify("hunter2", &salt, "not hex"));
    }

    #[test]
    fn salts_are_unique() {
        assert_ne!(CredentialHasher::generate_salt(), CredentialHasher::generate_salt());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(CredentialHasher::new(b"").is_err());
    }
}
