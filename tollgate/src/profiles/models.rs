use crate::auth::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Caller-supplied profile fields, used for both create and full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl ProfileData {
    pub fn into_profile(self, id: u64) -> Profile {
        Profile {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
        }
    }
}
