//! Feed view
//!
//! Lists posts newest first. Supports a manual refresh and a two-step
//! delete: `request_delete` opens the prompt, `confirm_delete` commits.

use std::sync::Arc;
use uuid::Uuid;

use super::ConfirmPrompt;
use crate::api::{ApiError, ApiResult, Post};
use crate::config::FeedLogoutPolicy;
use crate::session::SessionStore;

pub struct FeedView {
    session: Arc<SessionStore>,
    policy: FeedLogoutPolicy,
    posts: Vec<Post>,
    loading: bool,
    refreshing: bool,
    delete_prompt: ConfirmPrompt<Uuid>,
}

impl FeedView {
    /// New view in its initial loading state; call [`load`](Self::load) on mount
    pub fn new(session: Arc<SessionStore>, policy: FeedLogoutPolicy) -> Self {
        Self {
            session,
            policy,
            posts: Vec::new(),
            loading: true,
            refreshing: false,
            delete_prompt: ConfirmPrompt::delete_post(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Blocking spinner: initial fetch in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Non-blocking indicator: refresh in flight
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn delete_prompt(&self) -> &ConfirmPrompt<Uuid> {
        &self.delete_prompt
    }

    /// Initial fetch
    pub async fn load(&mut self) -> ApiResult<()> {
        self.fetch(false).await
    }

    /// Manual refresh
    pub async fn refresh(&mut self) -> ApiResult<()> {
        self.fetch(true).await
    }

    async fn fetch(&mut self, is_refresh: bool) -> ApiResult<()> {
        if is_refresh {
            self.refreshing = true;
        } else {
            self.loading = true;
        }

        let result = self.session.api().feed().await;
        self.loading = false;
        self.refreshing = false;

        match result {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Feed loaded");
                self.posts = posts;
                if is_refresh {
                    self.session.notifier().success("Feed refreshed!");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load feed: {}", e);
                self.session.notifier().error("Failed to load feed");
                if self.should_logout(&e) {
                    if let Err(err) = self.session.logout().await {
                        tracing::warn!("Logout after feed failure incomplete: {}", err);
                    }
                }
                Err(e)
            }
        }
    }

    fn should_logout(&self, error: &ApiError) -> bool {
        match self.policy {
            FeedLogoutPolicy::AuthErrors => error.is_auth_failure(),
            FeedLogoutPolicy::AnyError => true,
        }
    }

    /// Open the delete prompt for one of the viewer's own posts.
    /// Returns false when the post is not listed or not owned.
    pub fn request_delete(&mut self, id: Uuid) -> bool {
        let owned = self.posts.iter().any(|p| p.id == id && p.is_owner);
        if owned {
            self.delete_prompt.open(id);
        }
        owned
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt.cancel();
    }

    /// Delete the post awaiting confirmation. On success it is removed
    /// locally without a re-fetch; on failure the list is unchanged.
    pub async fn confirm_delete(&mut self) -> ApiResult<Option<Uuid>> {
        let Some(id) = self.delete_prompt.confirm() else {
            return Ok(None);
        };

        match self.session.api().delete_post(&id).await {
            Ok(()) => {
                self.posts.retain(|p| p.id != id);
                tracing::info!(post_id = %id, "Post deleted");
                self.session.notifier().success("Post deleted successfully");
                Ok(Some(id))
            }
            Err(e) => {
                tracing::warn!(post_id = %id, "Failed to delete post: {}", e);
                self.session.notifier().error("Failed to delete post");
                Err(e)
            }
        }
    }
}
