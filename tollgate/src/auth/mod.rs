// Public API
pub mod auth_service;
pub mod defaults;
pub mod error;
pub mod gate;
pub mod identity;
pub mod models;
pub mod password;
pub mod repository;
pub mod session;
pub mod sled_repository;
pub mod token;

// Re-export commonly used types
pub use auth_service::AuthService;
pub use error::AuthError;
pub use gate::{require_admin, require_authenticated};
pub use identity::{Identity, Principal};
pub use models::{Account, NewAccount, Role};
pub use repository::AccountRepository;
pub use session::{Resolution, SessionResolver};
pub use sled_repository::SledAccountRepository;
pub use token::{Claim, TokenCodec, TokenKind, TokenPair};
