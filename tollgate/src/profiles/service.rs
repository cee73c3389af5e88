use super::error::ProfileError;
use super::models::{Profile, ProfileData};
use super::repository::ProfileRepository;
use std::sync::Arc;
use tracing::info;

pub struct ProfileService {
    profile_repo: Arc<dyn ProfileRepository>,
}

impl ProfileService {
    pub fn new(profile_repo: Arc<dyn ProfileRepository>) -> Self {
        Self { profile_repo }
    }

    pub async fn create_profile(&self, data: ProfileData) -> Result<Profile, ProfileError> {
        let profile = self.profile_repo.create(data).await?;
        info!(profile_id = profile.id, "profile created");
        Ok(profile)
    }

    pub async fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError> {
        self.profile_repo.list_all().await
    }

    pub async fn get_profile(&self, id: u64) -> Result<Profile, ProfileError> {
        self.profile_repo
            .find_by_id(id)
            .await?
            .ok_or(ProfileError::NotFound)
    }

    /// Full replacement of name, email and role.
    pub async fn update_profile(&self, id: u64, data: ProfileData) -> Result<Profile, ProfileError> {
        let profile = self.profile_repo.update(id, data).await?;
        info!(profile_id = id, "profile updated");
        Ok(profile)
    }

    pub async fn delete_profile(&self, id: u64) -> Result<(), ProfileError> {
        self.profile_repo.delete(id).await?;
        info!(profile_id = id, "profile deleted");
        Ok(())
    }
}
