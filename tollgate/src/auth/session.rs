use super::identity::{Identity, Principal};
use super::repository::AccountRepository;
use super::token::{TokenCodec, TokenKind};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of resolving one request's session cookies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub identity: Identity,
    /// Set when a fresh access token was minted from the refresh token and
    /// must be written back to the client.
    pub reissued_access_token: Option<String>,
}

impl Resolution {
    fn anonymous() -> Self {
        Self::default()
    }

    fn authenticated(principal: Principal) -> Self {
        Self {
            identity: Identity::Authenticated(principal),
            reissued_access_token: None,
        }
    }
}

/// Turns the access/refresh token pair presented by a caller into an
/// [`Identity`], reissuing the access token from a valid refresh token.
///
/// Resolution never fails: every problem degrades to [`Identity::Anonymous`]
/// and rejection is left to the access gate.
///
/// A valid access token is trusted without consulting the account store, so a
/// deleted account or a changed role is only noticed once the access token
/// expires and the refresh path re-reads the account.
pub struct SessionResolver {
    codec: Arc<TokenCodec>,
    accounts: Arc<dyn AccountRepository>,
}

impl SessionResolver {
    pub fn new(codec: Arc<TokenCodec>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { codec, accounts }
    }

    pub async fn resolve(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> Resolution {
        if let Some(claim) = access_token.and_then(|token| self.codec.verify(token)) {
            return Resolution::authenticated(claim.principal());
        }

        let Some(refresh_token) = refresh_token else {
            return Resolution::anonymous();
        };

        let Some(refresh_claim) = self.codec.verify(refresh_token) else {
            debug!("refresh token rejected, continuing as anonymous");
            return Resolution::anonymous();
        };

        let account = match self.accounts.find_by_id(refresh_claim.id).await {
            Ok(Some(account)) => account,
            Ok(None) => {
                debug!(account_id = refresh_claim.id, "refresh token for unknown account");
                return Resolution::anonymous();
            }
            Err(e) => {
                warn!(account_id = refresh_claim.id, "account lookup failed during refresh: {}", e);
                return Resolution::anonymous();
            }
        };

        // Role comes from the store, not from the refresh claim.
        let principal = Principal {
            id: account.id,
            role: account.role,
        };

        let access_token = match self.codec.issue_kind(principal, TokenKind::Access) {
            Ok(token) => token,
            Err(e) => {
                warn!(account_id = account.id, "failed to reissue access token: {}", e);
                return Resolution::anonymous();
            }
        };

        let identity = match self.codec.verify(&access_token) {
            Some(claim) => Identity::Authenticated(claim.principal()),
            None => Identity::Anonymous,
        };

        info!(account_id = account.id, "reissued access token");

        Resolution {
            identity,
            reissued_access_token: Some(access_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{NewAccount, Role};
    use crate::auth::sled_repository::SledAccountRepository;
    use chrono::Utc;
    use shared::config::TokenConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        codec: Arc<TokenCodec>,
        accounts: Arc<dyn AccountRepository>,
        resolver: SessionResolver,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let accounts = Arc::new(
            SledAccountRepository::new(dir.path().join("accounts.sled")).unwrap(),
        ) as Arc<dyn AccountRepository>;
        let codec = Arc::new(TokenCodec::new(&TokenConfig::new("resolver-secret")));
        let resolver = SessionResolver::new(codec.clone(), accounts.clone());

        Fixture {
            _dir: dir,
            codec,
            accounts,
            resolver,
        }
    }

    async fn create_account(fx: &Fixture, email: &str, role: Role) -> Principal {
        let account = fx
            .accounts
            .create(
                NewAccount::new("Test".to_string(), email.to_string(), "hash".to_string())
                    .with_role(role),
            )
            .await
            .unwrap();
        Principal {
            id: account.id,
            role: account.role,
        }
    }

    fn expired_access(codec: &TokenCodec, principal: Principal) -> String {
        let an_hour_ago = Utc::now().timestamp() - 3600;
        codec
            .issue_at(principal, Duration::from_secs(900), an_hour_ago)
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_cookies_is_anonymous() {
        let fx = fixture();
        let resolution = fx.resolver.resolve(None, None).await;

        assert_eq!(resolution.identity, Identity::Anonymous);
        assert!(resolution.reissued_access_token.is_none());
    }

    #[tokio::test]
    async fn test_valid_access_token_authenticates() {
        let fx = fixture();
        let principal = create_account(&fx, "ada@example.com", Role::User).await;
        let access = fx.codec.issue_kind(principal, TokenKind::Access).unwrap();

        let resolution = fx.resolver.resolve(Some(&access), None).await;

        assert_eq!(resolution.identity, Identity::Authenticated(principal));
        assert!(resolution.reissued_access_token.is_none());
    }

    #[tokio::test]
    async fn test_valid_access_token_for_deleted_account_still_resolves() {
        let fx = fixture();
        let principal = create_account(&fx, "gone@example.com", Role::User).await;
        let access = fx.codec.issue_kind(principal, TokenKind::Access).unwrap();
        fx.accounts.delete(principal.id).await.unwrap();

        let resolution = fx.resolver.resolve(Some(&access), None).await;

        assert_eq!(resolution.identity, Identity::Authenticated(principal));
    }

    #[tokio::test]
    async fn test_expired_access_with_valid_refresh_reissues() {
        let fx = fixture();
        let principal = create_account(&fx, "ada@example.com", Role::User).await;
        let access = expired_access(&fx.codec, principal);
        let refresh = fx.codec.issue_kind(principal, TokenKind::Refresh).unwrap();

        let resolution = fx.resolver.resolve(Some(&access), Some(&refresh)).await;

        assert_eq!(resolution.identity, Identity::Authenticated(principal));
        let reissued = resolution.reissued_access_token.expect("new access token");
        let claim = fx.codec.verify(&reissued).unwrap();
        assert_eq!(claim.principal(), principal);
        assert_eq!(claim.exp - claim.iat, 15 * 60);
    }

    #[tokio::test]
    async fn test_missing_access_with_valid_refresh_reissues() {
        let fx = fixture();
        let principal = create_account(&fx, "ada@example.com", Role::User).await;
        let refresh = fx.codec.issue_kind(principal, TokenKind::Refresh).unwrap();

        let resolution = fx.resolver.resolve(None, Some(&refresh)).await;

        assert_eq!(resolution.identity, Identity::Authenticated(principal));
        assert!(resolution.reissued_access_token.is_some());
    }

    #[tokio::test]
    async fn test_garbage_access_with_valid_refresh_reissues() {
        let fx = fixture();
        let principal = create_account(&fx, "ada@example.com", Role::User).await;
        let refresh = fx.codec.issue_kind(principal, TokenKind::Refresh).unwrap();

        let resolution = fx.resolver.resolve(Some("garbage"), Some(&refresh)).await;

        assert_eq!(resolution.identity, Identity::Authenticated(principal));
        assert!(resolution.reissued_access_token.is_some());
    }

    #[tokio::test]
    async fn test_refresh_rereads_role_from_store() {
        let fx = fixture();
        let principal = create_account(&fx, "promoted@example.com", Role::User).await;
        let refresh = fx.codec.issue_kind(principal, TokenKind::Refresh).unwrap();

        let mut account = fx.accounts.find_by_id(principal.id).await.unwrap().unwrap();
        account.role = Role::Admin;
        fx.accounts.update(account).await.unwrap();

        let resolution = fx.resolver.resolve(None, Some(&refresh)).await;

        let resolved = resolution.identity.principal().copied().unwrap();
        assert_eq!(resolved.role, Role::Admin);
        let reissued = resolution.reissued_access_token.unwrap();
        assert_eq!(fx.codec.verify(&reissued).unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_account_is_anonymous() {
        let fx = fixture();
        let principal = create_account(&fx, "gone@example.com", Role::User).await;
        let refresh = fx.codec.issue_kind(principal, TokenKind::Refresh).unwrap();
        fx.accounts.delete(principal.id).await.unwrap();

        let resolution = fx.resolver.resolve(None, Some(&refresh)).await;

        assert_eq!(resolution, Resolution::anonymous());
    }

    #[tokio::test]
    async fn test_invalid_refresh_is_anonymous() {
        let fx = fixture();
        let principal = create_account(&fx, "ada@example.com", Role::User).await;
        let access = expired_access(&fx.codec, principal);
        let refresh = expired_access(&fx.codec, principal);

        let resolution = fx.resolver.resolve(Some(&access), Some(&refresh)).await;
        assert_eq!(resolution, Resolution::anonymous());

        let resolution = fx.resolver.resolve(Some(&access), Some("garbage")).await;
        assert_eq!(resolution, Resolution::anonymous());

        let resolution = fx.resolver.resolve(Some(&access), None).await;
        assert_eq!(resolution, Resolution::anonymous());
    }
}
