use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error,
};

use crate::models::Claims;

fn now() -> usize {
    Utc::now().timestamp().max(0) as usize
}

pub fn generate_token(admin_id: u64, email: &str, secret: &str, ttl: usize) -> Result<String, Error> {
    let iat = now();
    let claims = Claims {
        id: admin_id,
        email: email.to_string(),
        iat,
        exp: iat + ttl,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trips_claims() {
        let token = generate_token(7, "ops@company.com", SECRET, 3600).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();

        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "ops@company.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn rejects_foreign_secret() {
        let token = generate_token(7, "ops@company.com", SECRET, 3600).unwrap();
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let past = now() - 120;
        let claims = Claims {
            id: 1,
            email: "ops@company.com".into(),
            iat: past - 3600,
            exp: past,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, SECRET).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }
}
