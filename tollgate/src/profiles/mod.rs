pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod sled_repository;

pub use error::ProfileError;
pub use models::{Profile, ProfileData};
pub use repository::ProfileRepository;
pub use service::ProfileService;
pub use sled_repository::SledProfileRepository;
