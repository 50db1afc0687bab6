use chrono::Utc;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{LoginRequestDto, LoginResponseDto};
use crate::features::auth::models::{Admin, AdminSessionRecord, CurrentAdmin};

/// Service for admin credential lookup and session management.
///
/// Sessions live server-side: login creates a row keyed by the SHA-256
/// of the issued token, and every privileged request resolves its bearer
/// token against that table. Expired rows are deleted lazily on touch.
pub struct AuthService {
    pool: PgPool,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(pool: PgPool, session_ttl: Duration) -> Self {
        Self { pool, session_ttl }
    }

    /// Hex-encoded SHA-256, used for both password and token storage
    fn sha256_hex(input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }

    /// Verify credentials and open a new session
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let password_hash = Self::sha256_hex(&dto.password);

        let admin = sqlx::query_as::<_, Admin>(
            r#"
            SELECT id, username, password_hash, name, role, created_at
            FROM admin
            WHERE username = $1 AND password_hash = $2
            "#,
        )
        .bind(&dto.username)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up admin credentials: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::Unauthorized("Username atau password salah".to_string()))?;

        // Two v4 UUIDs worth of randomness; only the hash is stored
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let token_hash = Self::sha256_hex(&token);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.session_ttl)
                .map_err(|e| AppError::Internal(format!("Invalid session TTL: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO admin_sessions (admin_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(admin.id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::info!("Admin logged in: id={}, username={}", admin.id, admin.username);

        let current = CurrentAdmin {
            id: admin.id,
            username: admin.username,
            name: admin.name,
            role: admin.role,
        };

        Ok(LoginResponseDto {
            token,
            admin: current.into(),
        })
    }

    /// Resolve a bearer token to the acting admin.
    ///
    /// Expired sessions are removed as they are touched and reported the
    /// same way as missing ones: the caller must log in again.
    pub async fn resolve_session(&self, token: &str) -> Result<CurrentAdmin> {
        let token_hash = Self::sha256_hex(token);

        let record = sqlx::query_as::<_, AdminSessionRecord>(
            r#"
            SELECT s.id AS session_id, s.expires_at,
                   a.id AS admin_id, a.username, a.name, a.role
            FROM admin_sessions s
            JOIN admin a ON a.id = s.admin_id
            WHERE s.token_hash = $1
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Session admin tidak valid. Silakan login ulang.".to_string())
        })?;

        if record.expires_at <= Utc::now() {
            sqlx::query("DELETE FROM admin_sessions WHERE id = $1")
                .bind(record.session_id)
                .execute(&self.pool)
                .await?;

            return Err(AppError::Unauthorized(
                "Sesi berakhir. Silakan login ulang.".to_string(),
            ));
        }

        Ok(record.into())
    }

    /// Destroy the session for the given token (idempotent)
    pub async fn logout(&self, token: &str) -> Result<()> {
        let token_hash = Self::sha256_hex(token);

        sqlx::query("DELETE FROM admin_sessions WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_matches_known_vector() {
        // Matches the development seed migration
        assert_eq!(
            AuthService::sha256_hex("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn test_sha256_hex_is_deterministic() {
        assert_eq!(
            AuthService::sha256_hex("rahasia"),
            AuthService::sha256_hex("rahasia")
        );
        assert_ne!(
            AuthService::sha256_hex("rahasia"),
            AuthService::sha256_hex("rahasia2")
        );
    }
}
