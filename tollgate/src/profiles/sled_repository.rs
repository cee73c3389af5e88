use super::error::ProfileError;
use super::models::{Profile, ProfileData};
use super::repository::ProfileRepository;
use async_trait::async_trait;
use sled::transaction::{
    abort, ConflictableTransactionResult, TransactionResult, Transactional,
};
use sled::Db;
use std::path::Path;

const PROFILES_TREE: &str = "profiles";
const PROFILES_BY_EMAIL_TREE: &str = "profiles_by_email";

/// Profiles keyed by big-endian id, plus an email -> id index.
///
/// Every write touches both trees inside one transaction, so the index
/// always matches the stored profiles.
#[derive(Clone)]
pub struct SledProfileRepository {
    db: Db,
}

impl SledProfileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    fn profiles_tree(&self) -> Result<sled::Tree, ProfileError> {
        Ok(self.db.open_tree(PROFILES_TREE)?)
    }

    fn profiles_by_email_tree(&self) -> Result<sled::Tree, ProfileError> {
        Ok(self.db.open_tree(PROFILES_BY_EMAIL_TREE)?)
    }
}

fn decode(bytes: &[u8]) -> ConflictableTransactionResult<Profile, ProfileError> {
    serde_json::from_slice(bytes).or_else(|e| abort(ProfileError::from(e)))
}

#[async_trait]
impl ProfileRepository for SledProfileRepository {
    async fn create(&self, data: ProfileData) -> Result<Profile, ProfileError> {
        let id = self.db.generate_id()? + 1;
        let profile = data.into_profile(id);
        let profile_json = serde_json::to_vec(&profile)?;

        let profiles_tree = self.profiles_tree()?;
        let email_tree = self.profiles_by_email_tree()?;

        let result: TransactionResult<(), ProfileError> =
            (&profiles_tree, &email_tree).transaction(|(profiles, by_email)| {
                if by_email.get(profile.email.as_bytes())?.is_some() {
                    return abort(ProfileError::EmailAlreadyExists);
                }
                by_email.insert(profile.email.as_bytes(), &id.to_be_bytes()[..])?;
                profiles.insert(&id.to_be_bytes()[..], profile_json.as_slice())?;
                Ok(())
            });
        result?;

        Ok(profile)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Profile>, ProfileError> {
        match self.profiles_tree()?.get(id.to_be_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Profile>, ProfileError> {
        let profiles_tree = self.profiles_tree()?;
        let mut profiles = Vec::new();

        // Big-endian keys iterate in id order
        for item in profiles_tree.iter() {
            let (_, profile_data) = item?;
            let profile: Profile = serde_json::from_slice(&profile_data)?;
            profiles.push(profile);
        }

        Ok(profiles)
    }

    async fn update(&self, id: u64, data: ProfileData) -> Result<Profile, ProfileError> {
        let profile = data.into_profile(id);
        let profile_json = serde_json::to_vec(&profile)?;

        let profiles_tree = self.profiles_tree()?;
        let email_tree = self.profiles_by_email_tree()?;

        let result: TransactionResult<(), ProfileError> =
            (&profiles_tree, &email_tree).transaction(|(profiles, by_email)| {
                let previous = match profiles.get(id.to_be_bytes())? {
                    Some(bytes) => decode(&bytes)?,
                    None => return abort(ProfileError::NotFound),
                };

                if previous.email != profile.email {
                    if by_email.get(profile.email.as_bytes())?.is_some() {
                        return abort(ProfileError::EmailAlreadyExists);
                    }
                    by_email.remove(previous.email.as_bytes())?;
                    by_email.insert(profile.email.as_bytes(), &id.to_be_bytes()[..])?;
                }

                profiles.insert(&id.to_be_bytes()[..], profile_json.as_slice())?;
                Ok(())
            });
        result?;

        Ok(profile)
    }

    async fn delete(&self, id: u64) -> Result<(), ProfileError> {
        let profiles_tree = self.profiles_tree()?;
        let email_tree = self.profiles_by_email_tree()?;

        let result: TransactionResult<(), ProfileError> =
            (&profiles_tree, &email_tree).transaction(|(profiles, by_email)| {
                let Some(bytes) = profiles.remove(&id.to_be_bytes()[..])? else {
                    return abort(ProfileError::NotFound);
                };
                let profile = decode(&bytes)?;
                by_email.remove(profile.email.as_bytes())?;
                Ok(())
            });

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use tempfile::TempDir;

    fn data(name: &str, email: &str) -> ProfileData {
        ProfileData {
            name: name.to_string(),
            email: email.to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_profile_repository() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SledProfileRepository::new(temp_dir.path().join("profiles.sled")).unwrap();

        let first = repo.create(data("Ada", "ada@example.com")).await.unwrap();
        let second = repo.create(data("Grace", "grace@example.com")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all, vec![first.clone(), second.clone()]);

        assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first.clone()));

        repo.delete(first.id).await.unwrap();
        assert!(repo.find_by_id(first.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(first.id).await,
            Err(ProfileError::NotFound)
        ));

        // Email is free again after delete
        repo.create(data("Ada", "ada@example.com")).await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SledProfileRepository::new(temp_dir.path().join("profiles.sled")).unwrap();

        repo.create(data("Ada", "ada@example.com")).await.unwrap();
        let result = repo.create(data("Other", "ada@example.com")).await;
        assert!(matches!(result, Err(ProfileError::EmailAlreadyExists)));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SledProfileRepository::new(temp_dir.path().join("profiles.sled")).unwrap();

        let ada = repo.create(data("Ada", "ada@example.com")).await.unwrap();
        let grace = repo.create(data("Grace", "grace@example.com")).await.unwrap();

        // Same email, new name
        let renamed = repo
            .update(ada.id, data("Ada L", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Ada L");

        // Taking someone else's email is rejected
        let clash = repo.update(ada.id, data("Ada", "grace@example.com")).await;
        assert!(matches!(clash, Err(ProfileError::EmailAlreadyExists)));
        let unchanged = repo.find_by_id(ada.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "ada@example.com");

        // Moving to a fresh email releases the old one
        repo.update(ada.id, data("Ada", "lovelace@example.com"))
            .await
            .unwrap();
        repo.update(grace.id, data("Grace", "ada@example.com"))
            .await
            .unwrap();

        let missing = repo.update(9999, data("Nobody", "nobody@example.com")).await;
        assert!(matches!(missing, Err(ProfileError::NotFound)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = SledProfileRepository::new(temp_dir.path().join("profiles.sled")).unwrap();

        for round in 0..20 {
            let original = format!("ada{}@example.com", round);
            let moved = format!("moved{}@example.com", round);
            let profile = repo.create(data("Ada", &original)).await.unwrap();

            let updater = {
                let repo = repo.clone();
                let moved = moved.clone();
                tokio::spawn(async move { repo.update(profile.id, data("Ada", &moved)).await })
            };
            let deleter = {
                let repo = repo.clone();
                tokio::spawn(async move { repo.delete(profile.id).await })
            };

            // The update may lose the race and see NotFound; the delete always lands
            let _ = updater.await.unwrap();
            deleter.await.unwrap().unwrap();

            assert!(repo.find_by_id(profile.id).await.unwrap().is_none());

            // Neither email is left reserved
            repo.create(data("Ada", &original)).await.unwrap();
            repo.create(data("Ada", &moved)).await.unwrap();
        }
    }
}
