use crate::cookies::CookiePolicy;
use crate::middleware::RateLimiter;
use shared::config::Config;
use std::sync::Arc;
use std::time::Instant;
use tollgate::auth::{AccountRepository, AuthService, SessionResolver, TokenCodec};
use tollgate::profiles::{ProfileRepository, ProfileService};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub session_resolver: Arc<SessionResolver>,
    pub profile_service: Arc<ProfileService>,
    pub cookie_policy: CookiePolicy,
    pub rate_limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: &Config,
        accounts: Arc<dyn AccountRepository>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        // One codec, so every component signs and verifies with the same key
        let codec = Arc::new(TokenCodec::new(&config.tokens));

        Self {
            auth_service: Arc::new(AuthService::new(accounts.clone(), codec.clone())),
            session_resolver: Arc::new(SessionResolver::new(codec, accounts)),
            profile_service: Arc::new(ProfileService::new(profiles)),
            cookie_policy: CookiePolicy::from_config(config),
            rate_limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            started_at: Instant::now(),
        }
    }
}
