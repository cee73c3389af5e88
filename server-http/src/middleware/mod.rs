pub mod authorization;
pub mod rate_limit;
pub mod session;

pub use authorization::{require_admin, require_authenticated};
pub use rate_limit::{rate_limit, RateLimiter};
pub use session::resolve_session;
