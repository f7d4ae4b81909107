//! PostgreSQL adapter for ValueProfileRepository.
//!
//! One row per user. Per-source contributions are stored as a single JSONB
//! document so the schema does not change when the taxonomy does.
//!
//! Saves use optimistic locking: an existing row is only overwritten when
//! its version is exactly one below the incoming profile's.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId, ValueProfileId};
use crate::domain::profile::{ProfileSources, ValueProfile};
use crate::ports::ValueProfileRepository;

/// PostgreSQL implementation of ValueProfileRepository
pub struct PgValueProfileRepository {
    pool: PgPool,
}

impl PgValueProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build profile from database row
    fn from_db_row(row: &sqlx::postgres::PgRow) -> Result<ValueProfile, DomainError> {
        let id: Uuid = row.get("id");
        let user_id: String = row.get("user_id");
        let version: i32 = row.get("version");
        let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
        let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

        let sources: ProfileSources = serde_json::from_value(row.get("sources")).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to deserialize profile sources: {}", e),
            )
        })?;

        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user ID: {}", e)))?;

        let version = u32::try_from(version).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid profile version: {}", version),
            )
        })?;

        Ok(ValueProfile::reconstitute(
            ValueProfileId::from_uuid(id),
            user_id,
            version,
            sources,
            Timestamp::from_datetime(created_at),
            Timestamp::from_datetime(updated_at),
        ))
    }
}

fn stale_write(profile: &ValueProfile) -> DomainError {
    DomainError::conflict("Value profile was modified by another request")
        .with_detail("user_id", profile.user_id().as_str())
        .with_detail("version", profile.version().to_string())
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

#[async_trait]
impl ValueProfileRepository for PgValueProfileRepository {
    async fn save(&self, profile: &ValueProfile) -> Result<(), DomainError> {
        let sources = serde_json::to_value(profile.sources()).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize profile sources: {}", e),
            )
        })?;

        let result = sqlx::query(
            r#"
            INSERT INTO value_profiles (id, user_id, version, sources, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                version = EXCLUDED.version,
                sources = EXCLUDED.sources,
                updated_at = EXCLUDED.updated_at
            WHERE value_profiles.version = EXCLUDED.version - 1
            "#,
        )
        .bind(*profile.id().as_uuid())
        .bind(profile.user_id().as_str())
        .bind(profile.version() as i32)
        .bind(sources)
        .bind(*profile.created_at().as_datetime())
        .bind(*profile.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to save value profile", e))?;

        if result.rows_affected() == 0 {
            return Err(stale_write(profile));
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<ValueProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, version, sources, created_at, updated_at
            FROM value_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch value profile", e))?;

        row.as_ref().map(Self::from_db_row).transpose()
    }

    async fn delete_by_user(&self, user_id: &UserId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM value_profiles WHERE user_id = $1")
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete value profile", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_user_ids(&self, limit: usize) -> Result<Vec<UserId>, DomainError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query("SELECT user_id FROM value_profiles ORDER BY user_id ASC LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list profile owners", e))?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("user_id");
                UserId::new(id).map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid user ID: {}", e))
                })
            })
            .collect()
    }
}
