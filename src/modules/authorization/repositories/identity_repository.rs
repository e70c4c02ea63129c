// Resolves API keys to principals
//
// Keys are stored as argon2 hashes. The first eight characters of a key are
// kept in clear as a lookup prefix so verification only runs against a
// handful of candidate hashes.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::middleware::auth::{hash_api_key, verify_api_key};
use crate::modules::authorization::models::Principal;

/// Length of the clear-text lookup prefix
pub const API_KEY_PREFIX_LEN: usize = 8;

#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find the active principal owning this API key
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Principal>>;
}

pub struct MySqlIdentityRepository {
    pool: MySqlPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ApiKeyRow {
    id: i64,
    user_id: i64,
    key_hash: String,
    user_name: String,
}

impl MySqlIdentityRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Issue a new API key for a user, returning the clear-text key once
    pub async fn issue_api_key(&self, user_id: i64) -> Result<String> {
        let api_key = format!("so_{}", Uuid::new_v4().simple());
        let key_hash = hash_api_key(&api_key)?;

        sqlx::query(
            r#"
            INSERT INTO api_keys (user_id, key_prefix, key_hash, is_active)
            VALUES (?, ?, ?, TRUE)
            "#,
        )
        .bind(user_id)
        .bind(&api_key[..API_KEY_PREFIX_LEN])
        .bind(key_hash)
        .execute(&self.pool)
        .await?;

        Ok(api_key)
    }

    async fn load_permissions(&self, user_id: i64) -> Result<Vec<String>> {
        let identifiers = sqlx::query_scalar::<_, String>(
            "SELECT identifier FROM user_permissions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(identifiers)
    }
}

#[async_trait]
impl IdentityRepository for MySqlIdentityRepository {
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Principal>> {
        let Some(prefix) = api_key.get(..API_KEY_PREFIX_LEN) else {
            return Ok(None);
        };

        let candidates = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT k.id, k.user_id, k.key_hash, u.name AS user_name
            FROM api_keys k
            JOIN users u ON u.id = k.user_id
            WHERE k.key_prefix = ? AND k.is_active = TRUE
            "#,
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)?;

        for candidate in candidates {
            if !verify_api_key(api_key, &candidate.key_hash)? {
                continue;
            }

            // Update last_used_at timestamp (fire and forget)
            if let Err(e) = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = ?")
                .bind(candidate.id)
                .execute(&self.pool)
                .await
            {
                tracing::debug!(api_key_id = candidate.id, "Failed to touch API key: {}", e);
            }

            let principal = self
                .load_permissions(candidate.user_id)
                .await?
                .into_iter()
                .fold(
                    Principal::new(candidate.user_id, candidate.user_name),
                    Principal::with_identifier,
                );

            return Ok(Some(principal));
        }

        Ok(None)
    }
}

/// Fixed key-to-principal table for tests and local development
#[derive(Debug, Default, Clone)]
pub struct InMemoryIdentityRepository {
    keys: HashMap<String, Principal>,
}

impl InMemoryIdentityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, api_key: impl Into<String>, principal: Principal) -> Self {
        self.keys.insert(api_key.into(), principal);
        self
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Principal>> {
        Ok(self.keys.get(api_key).cloned())
    }
}
