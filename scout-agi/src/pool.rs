//! Bounded pool of remote agent sessions.
//!
//! Sessions are expensive to create and the remote side caps how many may
//! exist, so they are reused across searches. The pool never holds its lock
//! across an `.await`: remote calls happen after the bookkeeping is done.

use crate::client::AgentApi;
use crate::config::PoolConfig;
use scout_core::{Result, ScoutError};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::Instrument;

#[derive(Debug, Clone)]
struct PooledSession {
    id: String,
    created_at: Instant,
    last_used_at: Instant,
    busy: bool,
    current_task: Option<String>,
}

impl PooledSession {
    fn claimed(id: String, task: &str) -> Self {
        let now = Instant::now();
        Self {
            id,
            created_at: now,
            last_used_at: now,
            busy: true,
            current_task: Some(task.to_string()),
        }
    }

    /// Mark busy for `task`; returns how long the session sat idle.
    fn claim(&mut self, task: &str) -> std::time::Duration {
        let now = Instant::now();
        let idle = now.duration_since(self.last_used_at);
        self.busy = true;
        self.last_used_at = now;
        self.current_task = Some(task.to_string());
        idle
    }
}

#[derive(Default)]
struct PoolState {
    sessions: Vec<PooledSession>,
    /// Creations in flight. They count against the hard cap.
    creating: usize,
}

impl PoolState {
    fn take_expired(&mut self, ttl: std::time::Duration, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        self.sessions.retain(|s| {
            let stale = !s.busy && now.duration_since(s.created_at) > ttl;
            if stale {
                expired.push(s.id.clone());
            }
            !stale
        });
        expired
    }

    /// Drop the oldest idle session while above `target`.
    fn take_overflow(&mut self, target: usize) -> Option<String> {
        if self.sessions.len() <= target {
            return None;
        }
        let (index, _) = self
            .sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.busy)
            .min_by_key(|(_, s)| s.created_at)?;
        Some(self.sessions.remove(index).id)
    }
}

enum Claim {
    Reused(String, std::time::Duration),
    Create,
    Wait,
}

/// Reservation for a creation in flight. Dropping it while armed (failed
/// or cancelled creation) frees the slot and wakes a waiter.
struct CreationSlot<'a> {
    pool: &'a SessionPool,
    armed: bool,
}

impl Drop for CreationSlot<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.pool.lock().creating -= 1;
            self.pool.released.notify_one();
        }
    }
}

/// A claimed session that is released on drop, including when the owning
/// future is cancelled.
pub struct SessionLease<'a> {
    pool: &'a SessionPool,
    id: String,
}

impl SessionLease<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        self.pool.release(&self.id);
    }
}

/// Occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    pub total: usize,
    pub active: usize,
    pub available: usize,
}

/// Hands out remote session ids, creating sessions on demand up to
/// [`PoolConfig::max_pool_size`].
pub struct SessionPool {
    api: Arc<dyn AgentApi>,
    config: PoolConfig,
    state: Mutex<PoolState>,
    released: Notify,
}

impl SessionPool {
    pub fn new(api: Arc<dyn AgentApi>, config: PoolConfig) -> Self {
        Self { api, config, state: Mutex::new(PoolState::default()), released: Notify::new() }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn AgentApi> {
        &self.api
    }

    /// Claim a session for `task`, reusing an idle one when possible.
    ///
    /// When the pool is full this waits up to [`PoolConfig::wait_budget`],
    /// re-checking every [`PoolConfig::wait_interval`] or on release.
    pub async fn acquire(&self, task: &str) -> Result<String> {
        let span = scout_telemetry::pool_span("acquire", task);
        self.acquire_inner(task).instrument(span).await
    }

    async fn acquire_inner(&self, task: &str) -> Result<String> {
        let deadline = Instant::now() + self.config.wait_budget;
        let mut announced_wait = false;

        loop {
            let expired = self.lock().take_expired(self.config.session_ttl, Instant::now());
            for id in expired {
                tracing::info!(session.id = %id, "Cleaning up expired session");
                delete_remote(self.api.as_ref(), &id).await;
            }

            let claim = {
                let mut state = self.lock();
                if let Some(session) = state.sessions.iter_mut().find(|s| !s.busy) {
                    let idle = session.claim(task);
                    Claim::Reused(session.id.clone(), idle)
                } else if state.sessions.len() + state.creating < self.config.max_pool_size {
                    state.creating += 1;
                    Claim::Create
                } else {
                    Claim::Wait
                }
            };

            match claim {
                Claim::Reused(id, idle) => {
                    tracing::info!(session.id = %id, idle_secs = idle.as_secs(), "Reusing session");
                    return Ok(id);
                }
                Claim::Create => return self.create(task).await,
                Claim::Wait => {
                    let now = Instant::now();
                    if now >= deadline {
                        tracing::warn!(task, "No session became available");
                        return Err(ScoutError::PoolExhausted(self.config.wait_budget));
                    }
                    if !announced_wait {
                        tracing::info!(task, "Pool full, waiting for available session");
                        announced_wait = true;
                    }
                    let pause = self.config.wait_interval.min(deadline - now);
                    tokio::select! {
                        _ = self.released.notified() => {}
                        _ = tokio::time::sleep(pause) => {}
                    }
                }
            }
        }
    }

    /// Like [`acquire`](Self::acquire), but the session goes back to the
    /// pool when the lease is dropped.
    pub async fn lease(&self, task: &str) -> Result<SessionLease<'_>> {
        let id = self.acquire(task).await?;
        Ok(SessionLease { pool: self, id })
    }

    async fn create(&self, task: &str) -> Result<String> {
        tracing::info!(task, "Creating new session");
        let mut slot = CreationSlot { pool: self, armed: true };
        let id = self.api.create_session().await?;

        let evicted = {
            let mut state = self.lock();
            state.creating -= 1;
            slot.armed = false;
            state.sessions.push(PooledSession::claimed(id.clone(), task));
            state.take_overflow(self.config.target_size)
        };

        tracing::info!(session.id = %id, "Created new session");
        if let Some(old) = evicted {
            // The new session is already claimed, so the caller must not
            // await anything before it receives the id.
            tracing::info!(session.id = %old, "Evicting oldest idle session");
            let api = self.api.clone();
            tokio::spawn(async move { delete_remote(api.as_ref(), &old).await }.in_current_span());
        }
        Ok(id)
    }

    /// Return a session to the pool. Unknown ids are ignored.
    pub fn release(&self, session_id: &str) {
        let found = {
            let mut state = self.lock();
            match state.sessions.iter_mut().find(|s| s.id == session_id) {
                Some(session) => {
                    session.busy = false;
                    session.current_task = None;
                    true
                }
                None => false,
            }
        };
        if found {
            tracing::info!(session.id = %session_id, "Released session");
            self.released.notify_one();
        }
    }

    pub fn status(&self) -> PoolStatus {
        let state = self.lock();
        let active = state.sessions.iter().filter(|s| s.busy).count();
        PoolStatus {
            total: state.sessions.len(),
            active,
            available: state.sessions.len() - active,
        }
    }

    /// Task labels of busy sessions, keyed by session id.
    pub fn current_tasks(&self) -> Vec<(String, String)> {
        self.lock()
            .sessions
            .iter()
            .filter_map(|s| s.current_task.as_ref().map(|t| (s.id.clone(), t.clone())))
            .collect()
    }

    /// Delete every pooled session remotely and empty the pool.
    pub async fn cleanup(&self) {
        let ids: Vec<String> =
            std::mem::take(&mut self.lock().sessions).into_iter().map(|s| s.id).collect();
        tracing::info!(count = ids.len(), "Cleaning up all sessions");
        for id in ids {
            delete_remote(self.api.as_ref(), &id).await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn delete_remote(api: &dyn AgentApi, session_id: &str) {
    if let Err(e) = api.delete_session(session_id).await {
        tracing::warn!(session.id = %session_id, error = %e, "Failed to delete session");
    }
}
