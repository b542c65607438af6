//! Home view
//!
//! Shows the backend health message. The health check starts on mount; if
//! the view is torn down first, the late response is ignored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ApiClient;

/// What the home view displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Loading,
    Ready(String),
    Failed(String),
}

impl HealthStatus {
    pub fn text(&self) -> &str {
        match self {
            HealthStatus::Loading => "Loading...",
            HealthStatus::Ready(message) if message.is_empty() => "Loading...",
            HealthStatus::Ready(message) => message,
            HealthStatus::Failed(error) => error,
        }
    }
}

pub struct HomeView {
    status: watch::Receiver<HealthStatus>,
    mounted: Arc<AtomicBool>,
    check: Option<JoinHandle<bool>>,
}

impl HomeView {
    /// Mount the view and start the health check
    pub fn mount(api: ApiClient) -> Self {
        let (tx, status) = watch::channel(HealthStatus::Loading);
        let mounted = Arc::new(AtomicBool::new(true));

        let alive = mounted.clone();
        let check = tokio::spawn(async move {
            let next = match api.health().await {
                Ok(health) => HealthStatus::Ready(health.message),
                Err(e) => {
                    tracing::warn!("Health check failed: {}", e);
                    HealthStatus::Failed("Failed to load health".to_string())
                }
            };

            if !alive.load(Ordering::Acquire) {
                tracing::debug!("Home view unmounted, dropping health response");
                return false;
            }
            tx.send_replace(next);
            true
        });

        Self {
            status,
            mounted,
            check: Some(check),
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status.borrow().clone()
    }

    /// Wait until the health check has produced a result
    pub async fn settled(&mut self) -> HealthStatus {
        // The sender is dropped once the check finishes; either way the
        // latest value is final.
        let _ = self
            .status
            .wait_for(|status| *status != HealthStatus::Loading)
            .await;
        self.status()
    }

    /// Tear the view down. The returned handle resolves to whether the
    /// in-flight result was applied.
    pub fn unmount(mut self) -> Option<JoinHandle<bool>> {
        self.mounted.store(false, Ordering::Release);
        self.check.take()
    }
}

impl Drop for HomeView {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
    }
}
