//! Bearer token authentication.

use std::sync::Arc;

#[cfg(test)]
use jsonwebtoken::{encode, EncodingKey, Header};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use placebook_domain::{User, UserId};
use serde::{Deserialize, Serialize};

use crate::infrastructure::config::JwtConfig;
use crate::infrastructure::ports::ClockPort;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("invalid subject {subject:?}: {reason}")]
    InvalidSubject { subject: String, reason: String },
}

/// Claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub exp: i64,
}

/// Verifies HMAC-signed tokens and turns their claims into a [`User`].
pub struct JwtAuthenticator {
    algorithm: Algorithm,
    #[cfg(test)]
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn ClockPort>,
}

impl JwtAuthenticator {
    pub fn new(config: &JwtConfig, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            algorithm: config.algorithm,
            #[cfg(test)]
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            clock,
        }
    }

    /// Validate signature and algorithm, check `exp` against the injected
    /// clock, then resolve the subject.
    ///
    /// The subject must be a canonical, non-nil user id.
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.validate_exp = false;
        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        if claims.exp < self.clock.now().timestamp() {
            return Err(AuthError::Expired);
        }
        let id = UserId::parse(&claims.sub).map_err(|e| AuthError::InvalidSubject {
            subject: claims.sub.clone(),
            reason: e.to_string(),
        })?;
        if id.is_nil() {
            return Err(AuthError::InvalidSubject {
                subject: claims.sub,
                reason: "user id cannot be nil".into(),
            });
        }

        Ok(User::new(id, claims.email))
    }

    /// Sign a token for `user`, valid for `ttl` from the current clock time.
    #[cfg(test)]
    pub(crate) fn issue(&self, user: &User, ttl: chrono::Duration) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            exp: (self.clock.now() + ttl).timestamp(),
        };
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::{DateTime, TimeZone, Utc};

    fn config(algorithm: Algorithm, secret: &str) -> JwtConfig {
        JwtConfig {
            algorithm,
            secret: secret.to_string(),
        }
    }

    fn authenticator(secret: &str) -> JwtAuthenticator {
        JwtAuthenticator::new(&config(Algorithm::HS256, secret), Arc::new(SystemClock::new()))
    }

    #[test]
    fn issued_token_authenticates() {
        let auth = authenticator("test-secret");
        let user = User::new(UserId::new(), "someone@example.com");

        let token = auth.issue(&user, chrono::Duration::hours(1)).expect("sign");
        let resolved = auth.authenticate(&token).expect("verify");

        assert_eq!(resolved, user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = User::new(UserId::new(), "someone@example.com");
        let token = authenticator("one")
            .issue(&user, chrono::Duration::hours(1))
            .expect("sign");

        let err = authenticator("two").authenticate(&token).expect_err("bad signature");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let user = User::new(UserId::new(), "someone@example.com");
        let clock = Arc::new(SystemClock::new());
        let token = JwtAuthenticator::new(&config(Algorithm::HS512, "shared"), clock.clone())
            .issue(&user, chrono::Duration::hours(1))
            .expect("sign");

        let verifier = JwtAuthenticator::new(&config(Algorithm::HS256, "shared"), clock);
        assert!(verifier.authenticate(&token).is_err());
    }

    fn fixed_clock(now: DateTime<Utc>) -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(move || now);
        Arc::new(clock)
    }

    #[test]
    fn expiry_follows_the_injected_clock() {
        let issued_at = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let user = User::new(UserId::new(), "someone@example.com");
        let token = JwtAuthenticator::new(&config(Algorithm::HS256, "s"), fixed_clock(issued_at))
            .issue(&user, chrono::Duration::hours(1))
            .expect("sign");

        // Long expired by wall-clock time, still valid at the clock's time
        let within = JwtAuthenticator::new(
            &config(Algorithm::HS256, "s"),
            fixed_clock(issued_at + chrono::Duration::minutes(30)),
        );
        assert_eq!(within.authenticate(&token).expect("not yet expired"), user);

        let after = JwtAuthenticator::new(
            &config(Algorithm::HS256, "s"),
            fixed_clock(issued_at + chrono::Duration::hours(2)),
        );
        let err = after.authenticate(&token).expect_err("expired");
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn expired_token_is_rejected_by_system_clock() {
        let issued_at = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let user = User::new(UserId::new(), "someone@example.com");
        let token = JwtAuthenticator::new(&config(Algorithm::HS256, "s"), fixed_clock(issued_at))
            .issue(&user, chrono::Duration::hours(1))
            .expect("sign");

        let err = authenticator("s").authenticate(&token).expect_err("expired");
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn nil_or_malformed_subject_is_rejected() {
        let auth = authenticator("s");
        for subject in ["", "00000000-0000-0000-0000-000000000000", "not-a-user"] {
            let claims = Claims {
                sub: subject.to_string(),
                email: String::new(),
                exp: (Utc::now() + chrono::Duration::hours(1)).timestamp(),
            };
            let token = encode(
                &Header::new(Algorithm::HS256),
                &claims,
                &EncodingKey::from_secret(b"s"),
            )
            .expect("sign");

            let err = auth.authenticate(&token).expect_err(subject);
            assert!(matches!(err, AuthError::InvalidSubject { .. }), "{subject}");
        }
    }
}
