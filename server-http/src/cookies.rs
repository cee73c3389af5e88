use axum_extra::extract::cookie::{Cookie, SameSite};
use shared::config::Config;
use std::time::Duration;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Attributes shared by both session cookies.
///
/// `Max-Age` is the refresh lifetime for both cookies; token verification, not
/// cookie expiry, decides whether an access token is still usable.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    max_age: Duration,
    secure: bool,
}

impl CookiePolicy {
    pub fn new(max_age: Duration, secure: bool) -> Self {
        Self { max_age, secure }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tokens.refresh_ttl, config.cookie_secure)
    }

    pub fn access_cookie(&self, token: String) -> Cookie<'static> {
        self.build(ACCESS_TOKEN_COOKIE, token)
    }

    pub fn refresh_cookie(&self, token: String) -> Cookie<'static> {
        self.build(REFRESH_TOKEN_COOKIE, token)
    }

    fn build(&self, name: &'static str, value: String) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);

        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(cookie::time::Duration::seconds(max_age))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let policy = CookiePolicy::new(Duration::from_secs(604_800), false);
        let cookie = policy.access_cookie("abc".to_string());

        assert_eq!(cookie.name(), ACCESS_TOKEN_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::seconds(604_800)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_secure_flag() {
        let policy = CookiePolicy::new(Duration::from_secs(60), true);
        let cookie = policy.refresh_cookie("xyz".to_string());

        assert_eq!(cookie.name(), REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::seconds(60)));
    }
}
