use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Database model for an admin account
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Session row joined with its admin account, as read by token resolution
#[derive(Debug, Clone, FromRow)]
pub struct AdminSessionRecord {
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub admin_id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
}

/// The acting admin resolved from a session token.
///
/// Injected into request extensions by the auth middleware; review and
/// registry writes are stamped with this identity, never with an id
/// taken from a request payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentAdmin {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub role: String,
}

impl From<AdminSessionRecord> for CurrentAdmin {
    fn from(r: AdminSessionRecord) -> Self {
        Self {
            id: r.admin_id,
            username: r.username,
            name: r.name,
            role: r.role,
        }
    }
}
