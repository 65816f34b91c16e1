//! HS256 token issue/verify keyed by a shared secret.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use pts_core::EmployeeId;

use crate::{JwtClaims, Role};

/// Default access-token lifetime: one plant shift.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 8 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Symmetric JWT codec. One instance is shared by the login endpoint
/// (issue) and the authentication middleware (verify).
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: i64,
}

impl Hs256TokenCodec {
    pub fn new(secret: &str, ttl_seconds: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
        }
    }

    /// Issue a signed access token for `sub` carrying `roles`.
    pub fn issue(&self, sub: EmployeeId, roles: Vec<Role>) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub,
            roles,
            iat: now,
            exp: now + self.ttl_seconds,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Decode and verify a token (signature and expiry).
    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);

        jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> Hs256TokenCodec {
        Hs256TokenCodec::new("test-secret", DEFAULT_TOKEN_TTL_SECONDS)
    }

    #[test]
    fn issued_token_round_trips() {
        let codec = codec();
        let token = codec
            .issue(EmployeeId::new("SUP222"), vec![Role::supervisor()])
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, EmployeeId::new("SUP222"));
        assert!(claims.has_role(&Role::supervisor()));
        assert!(!claims.has_role(&Role::admin()));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Negative TTL beyond the decoder's leeway window.
        let codec = Hs256TokenCodec::new("test-secret", -3600);
        let token = codec
            .issue(EmployeeId::new("EJE444"), vec![Role::executor()])
            .unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = Hs256TokenCodec::new("other-secret", DEFAULT_TOKEN_TTL_SECONDS)
            .issue(EmployeeId::new("ADM999"), vec![Role::admin()])
            .unwrap();

        assert!(matches!(codec().verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            codec().verify("not-a-jwt"),
            Err(TokenError::Invalid(_))
        ));
    }
}
