use super::models::Role;
use serde::Serialize;

/// The `{id, role}` pair a token vouches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: u64,
    pub role: Role,
}

/// Who is making the current request. Lives for one request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    Authenticated(Principal),
    #[default]
    Anonymous,
}

impl Identity {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Identity::Authenticated(principal) => Some(principal),
            Identity::Anonymous => None,
        }
    }
}
