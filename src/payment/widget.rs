//! Payment Widget Script Management
//!
//! The widget is delivered as an external script injected into a shared
//! document. A [`WidgetMount`] owns one injected script and removes it when
//! dropped, whether or not the script ever finished loading.

use dashmap::DashMap;
use serde::Serialize;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use uuid::Uuid;

/// Load progress of an injected script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "camelCase")]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
struct InjectedScript {
    src: String,
    state: LoadState,
}

/// Shared document holding every injected widget script
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    scripts: DashMap<Uuid, InjectedScript>,
}

impl ScriptRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Injects a script and hands back the guard that will remove it.
    pub fn inject(self: &Arc<Self>, src: &str, state: LoadState) -> WidgetMount {
        let id = Uuid::new_v4();
        self.scripts.insert(
            id,
            InjectedScript {
                src: src.to_string(),
                state,
            },
        );
        tracing::debug!(script = %id, src, "payment widget script injected");

        WidgetMount {
            id,
            registry: Arc::clone(self),
            mounted_at: Instant::now(),
        }
    }

    /// Settles a still-loading script as ready. Later signals are ignored.
    pub fn mark_loaded(&self, id: Uuid) -> bool {
        self.settle(id, LoadState::Ready)
    }

    /// Settles a still-loading script as failed. Later signals are ignored.
    #[cfg(test)]
    pub fn mark_failed(&self, id: Uuid, reason: impl Into<String>) -> bool {
        self.settle(id, LoadState::Failed(reason.into()))
    }

    fn settle(&self, id: Uuid, next: LoadState) -> bool {
        match self.scripts.get_mut(&id) {
            Some(mut script) if script.state == LoadState::Loading => {
                script.state = next;
                true
            }
            _ => false,
        }
    }

    /// Number of scripts currently present in the document
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Whether a script with this source is currently injected
    #[cfg(test)]
    pub fn contains_src(&self, src: &str) -> bool {
        self.scripts.iter().any(|s| s.src == src)
    }

    fn state(&self, id: Uuid) -> Option<LoadState> {
        self.scripts.get(&id).map(|s| s.state.clone())
    }
}

/// Scoped ownership of one injected widget script
#[derive(Debug)]
pub struct WidgetMount {
    id: Uuid,
    registry: Arc<ScriptRegistry>,
    mounted_at: Instant,
}

impl WidgetMount {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current load state, treating a load that outlived `load_timeout` as failed.
    pub fn load_state(&self, load_timeout: Duration) -> LoadState {
        match self.registry.state(self.id) {
            Some(LoadState::Loading) if self.mounted_at.elapsed() >= load_timeout => {
                LoadState::Failed("payment widget timed out while loading".to_string())
            }
            Some(state) => state,
            None => LoadState::Failed("payment widget was removed".to_string()),
        }
    }
}

impl Drop for WidgetMount {
    fn drop(&mut self) {
        self.registry.scripts.remove(&self.id);
        tracing::debug!(script = %self.id, "payment widget script released");
    }
}
