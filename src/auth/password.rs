use argon2::{
    Argon2,
    password_hash::{
        Error, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

pub fn hash_password(password: &str) -> Result<String, Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// `Err` covers both a mismatch and a stored hash that cannot be parsed.
pub fn verify_password(password: &str, hashed: &str) -> Result<(), Error> {
    let parsed = PasswordHash::new(hashed)?;

    Argon2::default().verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).is_ok());
    }

    #[test]
    fn rejects_wrong_password() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter3", &hash).is_err());
    }

    #[test]
    fn salts_every_hash() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("hunter2", "plaintext").is_err());
    }
}
