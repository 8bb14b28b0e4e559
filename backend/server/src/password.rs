//! scrypt password hashing.
//!
//! Stored form is `<log_n>$<salt hex>$<hash hex>` so the cost can be raised
//! later without invalidating existing accounts.
use scrypt::{Params, scrypt};
use thiserror::Error;

const PW_HASH_R: u32 = 8;
const PW_HASH_P: u32 = 1;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

const FAKE_SALT: [u8; SALT_LEN] = [0x5a; SALT_LEN];

/// log2(N) of 20 already takes 1 GiB per hash.
pub const MAX_COST: u8 = 20;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Invalid scrypt parameters: {0}")]
    Params(String),

    #[error("Malformed password hash")]
    Malformed,
}

/// Rejects costs scrypt refuses and costs too expensive to run per request.
pub fn check_cost(cost: u8) -> Result<u8, PasswordError> {
    if cost > MAX_COST {
        return Err(PasswordError::Params(format!(
            "cost {cost} is above the maximum of {MAX_COST}"
        )));
    }

    Params::new(cost, PW_HASH_R, PW_HASH_P, HASH_LEN)
        .map_err(|e| PasswordError::Params(e.to_string()))?;

    Ok(cost)
}

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u8,
}

impl PasswordHasher {
    pub fn new(cost: u8) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt: [u8; SALT_LEN] = rand::random();
        let hash = derive(password, &salt, self.cost)?;

        Ok(format!(
            "{}${}${}",
            self.cost,
            hex::encode(salt),
            hex::encode(hash)
        ))
    }

    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let (cost, salt, expected) = split(encoded)?;
        let hash = derive(password, &salt, cost)?;

        Ok(hash.as_slice() == expected.as_slice())
    }

    /// Same amount of work as a real verification, for usernames that don't
    /// exist. Keeps unknown and known users indistinguishable by timing.
    pub fn burn(&self, password: &str) {
        let _ = derive(password, &FAKE_SALT, self.cost);
    }
}

fn derive(password: &str, salt: &[u8], cost: u8) -> Result<[u8; HASH_LEN], PasswordError> {
    let params = Params::new(cost, PW_HASH_R, PW_HASH_P, HASH_LEN)
        .map_err(|e| PasswordError::Params(e.to_string()))?;

    let mut output = [0u8; HASH_LEN];
    scrypt(password.as_bytes(), salt, &params, &mut output)
        .map_err(|e| PasswordError::Params(e.to_string()))?;

    Ok(output)
}

fn split(encoded: &str) -> Result<(u8, Vec<u8>, Vec<u8>), PasswordError> {
    let mut parts = encoded.splitn(3, '$');

    let cost = parts
        .next()
        .and_then(|c| c.parse().ok())
        .ok_or(PasswordError::Malformed)?;
    let salt = parts
        .next()
        .and_then(|s| hex::decode(s).ok())
        .ok_or(PasswordError::Malformed)?;
    let hash = parts
        .next()
        .and_then(|h| hex::decode(h).ok())
        .filter(|h| h.len() == HASH_LEN)
        .ok_or(PasswordError::Malformed)?;

    Ok((cost, salt, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cheap cost so debug-build tests stay fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let encoded = hasher().hash("mypass123").unwrap();
        assert!(hasher().verify("mypass123", &encoded).unwrap());
        assert!(!hasher().verify("mypass124", &encoded).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let first = hasher().hash("same").unwrap();
        let second = hasher().hash("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_encoded_layout() {
        let encoded = hasher().hash("pw").unwrap();
        let parts: Vec<&str> = encoded.split('$').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "4");
        assert_eq!(parts[1].len(), SALT_LEN * 2);
        assert_eq!(parts[2].len(), HASH_LEN * 2);
    }

    #[test]
    fn test_verify_uses_stored_cost() {
        let encoded = PasswordHasher::new(5).hash("pw").unwrap();
        assert!(hasher().verify("pw", &encoded).unwrap());
    }

    #[test]
    fn test_check_cost() {
        assert_eq!(check_cost(4).unwrap(), 4);
        assert_eq!(check_cost(15).unwrap(), 15);
        assert_eq!(check_cost(MAX_COST).unwrap(), MAX_COST);

        assert!(matches!(check_cost(21), Err(PasswordError::Params(_))));
        assert!(matches!(check_cost(64), Err(PasswordError::Params(_))));
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            hasher().verify("pw", "nonsense"),
            Err(PasswordError::Malformed)
        ));
        assert!(matches!(
            hasher().verify("pw", "4$zz$00"),
            Err(PasswordError::Malformed)
        ));
    }
}
