pub mod auth;
pub mod health;
pub mod profiles;

pub use auth::{login, signup};
pub use health::health_check;
pub use profiles::{create_profile, delete_profile, get_profile, list_profiles, update_profile};
