use serde::Serialize;
use tollgate::profiles::Profile;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    #[serde(rename = "Status")]
    pub status: &'static str,
    /// Seconds since the process started
    #[serde(rename = "RunTime")]
    pub run_time: f64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: Profile,
}

#[derive(Debug, Serialize)]
pub struct ListProfilesResponse {
    pub message: &'static str,
    pub users: Vec<Profile>,
}
