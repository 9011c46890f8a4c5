//! Per-caller session data and the home page visit counter

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::error::{AppError, AppResult};

/// Session key holding the home page visit counter
pub const NUM_VISITS_KEY: &str = "num_visits";

/// Integer values scoped to one session id
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get_int(&self, session_id: &str, key: &str) -> AppResult<Option<i64>>;
    async fn set_int(&self, session_id: &str, key: &str, value: i64) -> AppResult<()>;
}

/// Sessions kept in a Redis hash per session, expiring after the TTL
#[derive(Clone)]
pub struct RedisSessionStore {
    client: Client,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    /// Create a new Redis session store and check connectivity
    pub async fn new(url: &str, ttl_seconds: u64) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    fn key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get_int(&self, session_id: &str, key: &str) -> AppResult<Option<i64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<i64> = conn.hget(Self::key(session_id), key).await?;
        Ok(value)
    }

    async fn set_int(&self, session_id: &str, key: &str, value: i64) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let redis_key = Self::key(session_id);

        // Every write refreshes the session lifetime
        redis::pipe()
            .atomic()
            .hset(&redis_key, key, value)
            .ignore()
            .expire(&redis_key, self.ttl_seconds as i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await?;

        Ok(())
    }
}

/// Process-local sessions, lost on restart
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, HashMap<String, i64>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get_int(&self, session_id: &str, key: &str) -> AppResult<Option<i64>> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| AppError::SessionStore("Session map poisoned".to_string()))?;
        Ok(sessions.get(session_id).and_then(|s| s.get(key)).copied())
    }

    async fn set_int(&self, session_id: &str, key: &str, value: i64) -> AppResult<()> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| AppError::SessionStore("Session map poisoned".to_string()))?;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Count a home page visit. Returns the number of earlier visits in this
    /// session (0 on the first one) and stores the incremented value.
    pub async fn record_visit(&self, session_id: &str) -> AppResult<i64> {
        let num_visits = self
            .store
            .get_int(session_id, NUM_VISITS_KEY)
            .await?
            .unwrap_or(0);

        self.store
            .set_int(session_id, NUM_VISITS_KEY, num_visits + 1)
            .await?;

        tracing::debug!(session_id, num_visits, "Recorded home page visit");
        Ok(num_visits)
    }
}
