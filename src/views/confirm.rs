//! Confirm-then-commit prompt
//!
//! Destructive actions (deleting a post, logging out) open a prompt first;
//! the action runs only when the prompt is confirmed.

/// A pending destructive action awaiting confirmation
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmPrompt<T> {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
    pending: Option<T>,
}

impl<T> ConfirmPrompt<T> {
    pub fn new(title: &'static str, message: &'static str, confirm_label: &'static str) -> Self {
        Self {
            title,
            message,
            confirm_label,
            cancel_label: "Cancel",
            pending: None,
        }
    }

    /// Open the prompt for `item`, replacing any earlier pending item
    pub fn open(&mut self, item: T) {
        self.pending = Some(item);
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Close without acting
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Close and hand back the item to act on
    pub fn confirm(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn delete_post() -> Self {
        Self::new(
            "Delete Post",
            "Are you sure you want to delete this post? This action cannot be undone.",
            "Delete",
        )
    }

    pub fn logout() -> Self {
        Self::new("Logout", "Are you sure you want to logout?", "Logout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_returns_pending_once() {
        let mut prompt = ConfirmPrompt::delete_post();
        assert!(!prompt.is_open());

        prompt.open(7u32);
        assert!(prompt.is_open());
        assert_eq!(prompt.pending(), Some(&7));

        assert_eq!(prompt.confirm(), Some(7));
        assert!(!prompt.is_open());
        assert_eq!(prompt.confirm(), None);
    }

    #[test]
    fn test_cancel_discards() {
        let mut prompt = ConfirmPrompt::logout();
        prompt.open(());
        assert_eq!(prompt.cancel(), Some(()));
        assert_eq!(prompt.confirm(), None);
        assert_eq!(prompt.confirm_label, "Logout");
    }
}
