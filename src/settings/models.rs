// src/settings/models.rs

use serde::Deserialize;

/// PUT /api/settings/profile request body
#[derive(Deserialize, Debug)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// PUT /api/settings/password request body
#[derive(Deserialize, Debug)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
