//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying `{id, role, iat, exp}`. The same codec mints
//! both access and refresh tokens; only the lifetime differs. Verification
//! collapses every failure (bad signature, garbage input, expiry) into `None`.

use super::error::AuthError;
use super::identity::Principal;
use super::models::Role;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::config::TokenConfig;
use std::time::Duration;

/// Decoded payload of a verified token. Timestamps are seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claim {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
        }
    }
}

/// Which lifetime to apply when minting a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Access and refresh tokens minted together at login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock so that `exp == now` is
        // already expired and tests can pin the time.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Mint a token of the given kind for `principal`, valid from now.
    pub fn issue_kind(&self, principal: Principal, kind: TokenKind) -> Result<String, AuthError> {
        self.issue(principal, self.ttl(kind))
    }

    pub fn issue(&self, principal: Principal, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(principal, ttl, Utc::now().timestamp())
    }

    pub fn issue_at(
        &self,
        principal: Principal,
        ttl: Duration,
        now: i64,
    ) -> Result<String, AuthError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claim = Claim {
            id: principal.id,
            role: principal.role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claim, &self.encoding_key)?)
    }

    pub fn issue_pair(&self, principal: Principal) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue_kind(principal, TokenKind::Access)?,
            refresh_token: self.issue_kind(principal, TokenKind::Refresh)?,
        })
    }

    pub fn verify(&self, token: &str) -> Option<Claim> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify signature and structure, then reject anything with `exp <= now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Option<Claim> {
        let claim = match decode::<Claim>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("token rejected: {}", e);
                return None;
            }
        };

        if claim.exp <= now {
            tracing::debug!("token rejected: expired at {}", claim.exp);
            return None;
        }

        Some(claim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&TokenConfig::new("test_secret_key_for_testing_only_32bytes!"))
    }

    fn alice() -> Principal {
        Principal {
            id: 42,
            role: Role::User,
        }
    }

    #[test]
    fn test_issue_then_verify_before_expiry() {
        let codec = codec();
        let now = 1_700_000_000;
        let token = codec
            .issue_at(alice(), Duration::from_secs(900), now)
            .unwrap();

        for t in [now, now + 1, now + 899] {
            let claim = codec.verify_at(&token, t).expect("token should verify");
            assert_eq!(claim.id, 42);
            assert_eq!(claim.role, Role::User);
            assert_eq!(claim.iat, now);
            assert_eq!(claim.exp, now + 900);
        }
    }

    #[test]
    fn test_expiry_has_no_grace_window() {
        let codec = codec();
        let now = 1_700_000_000;
        let token = codec
            .issue_at(alice(), Duration::from_secs(900), now)
            .unwrap();

        assert!(codec.verify_at(&token, now + 900).is_none());
        assert!(codec.verify_at(&token, now + 10_000).is_none());
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let codec = codec();
        let token = codec.issue(alice(), Duration::ZERO).unwrap();
        assert!(codec.verify(&token).is_none());
    }

    #[test]
    fn test_verify_with_wall_clock() {
        let codec = codec();
        let token = codec.issue_kind(alice(), TokenKind::Access).unwrap();
        let claim = codec.verify(&token).unwrap();
        assert_eq!(claim.principal(), alice());
    }

    #[test]
    fn test_verify_is_idempotent() {
        let codec = codec();
        let token = codec.issue_kind(alice(), TokenKind::Refresh).unwrap();

        let first = codec.verify(&token).unwrap();
        let second = codec.verify(&token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenCodec::new(&TokenConfig::new("secret_one"));
        let verifier = TokenCodec::new(&TokenConfig::new("secret_two"));

        let token = issuer.issue_kind(alice(), TokenKind::Access).unwrap();
        assert!(verifier.verify(&token).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = codec();
        assert!(codec.verify("").is_none());
        assert!(codec.verify("invalid.token.here").is_none());
        assert!(codec.verify("not a token at all").is_none());
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.issue_kind(alice(), TokenKind::Access).unwrap();
        let admin = codec
            .issue_kind(
                Principal {
                    id: 42,
                    role: Role::Admin,
                },
                TokenKind::Access,
            )
            .unwrap();

        // Splice the admin payload onto the user signature
        let parts: Vec<&str> = token.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], admin_parts[1], parts[2]);

        assert!(codec.verify(&forged).is_none());
    }

    #[test]
    fn test_pair_lifetimes() {
        let codec = TokenCodec::new(&TokenConfig {
            secret: "pair".to_string(),
            access_ttl: Duration::from_secs(60),
            refresh_ttl: Duration::from_secs(3600),
        });

        let pair = codec.issue_pair(alice()).unwrap();
        let access = codec.verify(&pair.access_token).unwrap();
        let refresh = codec.verify(&pair.refresh_token).unwrap();

        assert_eq!(access.principal(), refresh.principal());
        assert_eq!(access.exp - access.iat, 60);
        assert_eq!(refresh.exp - refresh.iat, 3600);
    }
}
