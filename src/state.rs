//! Application state: configuration, the platform client and the in-memory
//! editor session store.
//!
//! Sessions live only in memory and are keyed by a random UUID. Saves work
//! from a cloned snapshot, so the store lock is never held across an
//! upstream call; two overlapping saves of one session both go through
//! (last write wins on the platform).

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::{load_admin_config_from_env, AdminConfig};
use crate::editor::{EditOp, EditorSession};
use crate::error::{AdminError, AdminResult};
use crate::protocol::PageChrome;
use crate::upstream::PlatformClient;

#[derive(Clone)]
pub struct AppState {
    pub config: AdminConfig,
    pub upstream: PlatformClient,
    pub sessions: Arc<RwLock<HashMap<Uuid, EditorSession>>>,
}

impl AppState {
    /// Build state from env: load config, build the upstream client.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> AdminResult<Self> {
        Self::new(load_admin_config_from_env())
    }

    pub fn new(config: AdminConfig) -> AdminResult<Self> {
        let upstream = PlatformClient::from_config(&config.upstream)?;
        info!(
            target: "lingua_admin",
            base_url = %upstream.base_url,
            timeout_secs = config.upstream.timeout_secs,
            token = config.upstream.token.is_some(),
            ru_fields_policy = ?config.editor.ru_fields_policy,
            "Platform API client ready"
        );
        Ok(Self {
            config,
            upstream,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn analytics_chrome(&self) -> PageChrome {
        PageChrome { body_class: self.config.chrome.analytics_body_class.clone() }
    }

    pub fn editor_chrome(&self) -> PageChrome {
        PageChrome { body_class: self.config.chrome.editor_body_class.clone() }
    }

    /// Insert a session into the store.
    #[instrument(level = "debug", skip(self, s), fields(session = %s.id))]
    pub async fn insert_session(&self, s: EditorSession) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(s.id, s);
        debug!(target: "editor", open_sessions = sessions.len(), "Session stored");
    }

    /// Snapshot of a session.
    pub async fn get_session(&self, id: Uuid) -> AdminResult<EditorSession> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(AdminError::SessionNotFound(id))
    }

    /// Apply an edit batch in place and return the updated snapshot.
    pub async fn edit_session(&self, id: Uuid, ops: Vec<EditOp>) -> AdminResult<EditorSession> {
        let mut sessions = self.sessions.write().await;
        let s = sessions.get_mut(&id).ok_or(AdminError::SessionNotFound(id))?;
        s.apply(ops)?;
        Ok(s.clone())
    }

    /// Bind a session to the module id a create returned.
    pub async fn bind_module(&self, id: Uuid, module_id: i64) -> AdminResult<()> {
        let mut sessions = self.sessions.write().await;
        let s = sessions.get_mut(&id).ok_or(AdminError::SessionNotFound(id))?;
        s.module_id = Some(module_id);
        Ok(())
    }

    pub async fn remove_session(&self, id: Uuid) -> AdminResult<()> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AdminError::SessionNotFound(id))
    }
}
