use super::error::ProfileError;
use super::models::{Profile, ProfileData};
use async_trait::async_trait;

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create a profile, assigning its id. Emails are unique.
    async fn create(&self, data: ProfileData) -> Result<Profile, ProfileError>;

    /// Find a profile by ID
    async fn find_by_id(&self, id: u64) -> Result<Option<Profile>, ProfileError>;

    /// List all profiles in id order
    async fn list_all(&self) -> Result<Vec<Profile>, ProfileError>;

    /// Replace the fields of an existing profile
    async fn update(&self, id: u64, data: ProfileData) -> Result<Profile, ProfileError>;

    /// Delete a profile by ID
    async fn delete(&self, id: u64) -> Result<(), ProfileError>;
}
