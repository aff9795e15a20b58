//! JWT Token Service (HS256)

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::application::ports::{AuthError, TokenServicePort};

/// 令牌载荷
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// 用户 ID
    sub: String,
    iat: i64,
    exp: i64,
}

/// JWT 令牌服务
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}

impl TokenServicePort for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        self.sign(&Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        })
    }

    fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Uuid::parse_str(&data.claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-at-least-16-bytes";

    #[test]
    fn test_issue_and_verify() {
        let service = JwtTokenService::new(SECRET, Duration::from_secs(3600));
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id).unwrap();
        assert_eq!(service.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_rejects_foreign_and_garbage_tokens() {
        let service = JwtTokenService::new(SECRET, Duration::from_secs(3600));
        let other = JwtTokenService::new("another-secret-of-16-bytes", Duration::from_secs(3600));

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken(_))));
        assert!(matches!(service.verify("not.a.jwt"), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        let service = JwtTokenService::new(SECRET, Duration::from_secs(3600));
        let now = Utc::now().timestamp();
        let token = service
            .sign(&Claims {
                sub: Uuid::new_v4().to_string(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken(_))));
    }
}
