//! JWT Token Handler
//! Mission: Issue and verify signed, time-bound identity tokens

use crate::auth::models::{Claims, Identity};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// A freshly signed token and its validity window (unix seconds).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl IssuedToken {
    pub fn expires_in(&self) -> i64 {
        self.expires_at - self.issued_at
    }
}

/// Unix-seconds clock that never reads backwards within the process.
///
/// Anchored to wall time once, then advanced by `Instant`.
#[derive(Debug, Clone, Copy)]
struct MonotonicClock {
    anchor: Instant,
    anchor_unix_ms: i64,
}

impl MonotonicClock {
    fn new() -> Self {
        Self {
            anchor: Instant::now(),
            anchor_unix_ms: Utc::now().timestamp_millis(),
        }
    }

    fn now(&self) -> i64 {
        let elapsed_ms = self.anchor.elapsed().as_millis() as i64;
        (self.anchor_unix_ms + elapsed_ms).div_euclid(1000)
    }
}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    lifetime: Duration,
    clock: MonotonicClock,
}

impl JwtHandler {
    /// Create a handler bound to one symmetric key for the life of the process.
    pub fn new(secret: &[u8], issuer: impl Into<String>, lifetime: Duration) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against our own clock so the boundary is exact.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[issuer.as_str()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer,
            lifetime,
            clock: MonotonicClock::new(),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn issue(&self, identity: Identity) -> Result<IssuedToken, TokenError> {
        self.issue_at(identity, self.clock.now())
    }

    pub fn issue_at(&self, identity: Identity, now: i64) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            user_id: identity.user_id,
            role: identity.role,
            iat: now,
            exp: now + self.lifetime.num_seconds(),
            iss: self.issuer.clone(),
        };

        debug!(
            "Issuing JWT for user {} ({}), expires in {}s",
            claims.user_id,
            claims.role,
            self.lifetime.num_seconds()
        );

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Signature, structure and required claims first, then expiry at `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Rejected JWT: {}", e);
                TokenError::Invalid
            })?;

        if now >= decoded.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(decoded.claims.identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-12345";

    fn handler() -> JwtHandler {
        JwtHandler::new(SECRET, "edulearn", Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let handler = handler();
        let identity = Identity::new(42, UserRole::Instructor);

        let issued = handler.issue(identity).unwrap();
        assert!(!issued.token.is_empty());
        assert_eq!(issued.expires_in(), 3600);

        let verified = handler.verify(&issued.token).unwrap();
        assert_eq!(verified, identity);
    }

    #[test]
    fn test_expiry_boundary_is_exact() {
        let handler = handler();
        let identity = Identity::new(7, UserRole::Student);
        let issued = handler.issue_at(identity, 1_000_000).unwrap();

        assert_eq!(issued.expires_at, 1_003_600);
        assert_eq!(handler.verify_at(&issued.token, 1_000_000), Ok(identity));
        assert_eq!(handler.verify_at(&issued.token, 1_003_599), Ok(identity));
        assert_eq!(
            handler.verify_at(&issued.token, 1_003_600),
            Err(TokenError::Expired)
        );
        assert_eq!(
            handler.verify_at(&issued.token, 1_009_999),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_expired_token_via_process_clock() {
        let handler = handler();
        let identity = Identity::new(1, UserRole::Admin);
        let issued = handler.issue_at(identity, 10).unwrap();

        assert_eq!(handler.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_invalid_token_rejected() {
        let handler = handler();
        assert_eq!(
            handler.verify("invalid.token.here"),
            Err(TokenError::Invalid)
        );
        assert_eq!(handler.verify(""), Err(TokenError::Invalid));
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = JwtHandler::new(b"secret1", "edulearn", Duration::hours(1));
        let handler2 = JwtHandler::new(b"secret2", "edulearn", Duration::hours(1));

        let issued = handler1
            .issue(Identity::new(3, UserRole::Student))
            .unwrap();
        assert_eq!(handler2.verify(&issued.token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let ours = handler();
        let theirs = JwtHandler::new(SECRET, "someone-else", Duration::hours(1));

        let issued = theirs.issue(Identity::new(3, UserRole::Admin)).unwrap();
        assert_eq!(ours.verify(&issued.token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_missing_claims_rejected() {
        let handler = handler();
        let now = Utc::now().timestamp();
        // Correctly signed, but no role claim.
        let token = encode(
            &Header::new(ALGORITHM),
            &json!({ "user_id": 5, "iat": now, "exp": now + 600, "iss": "edulearn" }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(handler.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let handler = handler();
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 5,
            role: UserRole::Admin,
            iat: now,
            exp: now + 600,
            iss: "edulearn".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(handler.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn test_clock_never_reads_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..1000 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
        assert!((last - Utc::now().timestamp()).abs() <= 1);
    }
}
