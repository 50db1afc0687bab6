use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::CurrentAdmin;

/// Request DTO for admin login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(length(min = 1, message = "Username wajib diisi"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

/// Public profile of an admin account, as returned to the browser
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminProfileDto {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
}

impl From<CurrentAdmin> for AdminProfileDto {
    fn from(a: CurrentAdmin) -> Self {
        Self {
            id: a.id,
            username: a.username,
            name: a.name,
            role: a.role,
        }
    }
}

/// Response DTO for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Bearer token for subsequent requests
    pub token: String,
    pub admin: AdminProfileDto,
}
