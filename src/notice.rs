//! User-facing notices.
//!
//! A [`NoticeBus`] is an explicit observable owned by whoever raises notices (normally the
//! [`crate::Editor`]). Views hold a [`NoticeSubscription`] for as long as they are mounted; dropping
//! it unsubscribes.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::foundation::error::{TwibbonError, TwibbonResult};

/// Default time a notice stays active.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Notice severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeVariant {
    /// Operation completed.
    Success,
    /// Operation failed.
    Danger,
}

/// Notice identifier, unique per bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(pub u64);

/// One active notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Identifier used to dismiss the notice.
    pub id: NoticeId,
    /// Short headline.
    pub title: String,
    /// Optional detail line.
    pub description: Option<String>,
    /// Severity.
    pub variant: NoticeVariant,
    /// When the notice was raised.
    pub posted_at: Instant,
}

/// Observable list of active notices.
#[derive(Debug)]
pub struct NoticeBus {
    tx: watch::Sender<Vec<Notice>>,
    next_id: u64,
    ttl: Duration,
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl NoticeBus {
    /// Bus whose notices expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx, next_id: 0, ttl }
    }

    /// Raise a notice now.
    pub fn push(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        variant: NoticeVariant,
    ) -> NoticeId {
        self.push_at(title, description, variant, Instant::now())
    }

    /// Raise a notice stamped with `now`.
    pub fn push_at(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        variant: NoticeVariant,
        now: Instant,
    ) -> NoticeId {
        self.next_id += 1;
        let id = NoticeId(self.next_id);
        let notice = Notice {
            id,
            title: title.into(),
            description,
            variant,
            posted_at: now,
        };
        tracing::debug!(id = id.0, title = %notice.title, ?variant, "notice");
        self.tx.send_modify(|list| list.push(notice));
        id
    }

    /// Raise a `Danger` notice describing `err`.
    pub fn report_error(&mut self, err: &TwibbonError) -> NoticeId {
        self.push(
            err.notice_title(),
            Some(err.to_string()),
            NoticeVariant::Danger,
        )
    }

    /// Remove one notice. Returns `false` if it was already gone.
    pub fn dismiss(&mut self, id: NoticeId) -> bool {
        let mut removed = false;
        self.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| n.id != id);
            removed = list.len() != before;
            removed
        });
        removed
    }

    /// Remove every notice.
    pub fn clear(&mut self) {
        self.tx.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    /// Drop notices older than the TTL as of `now`; returns how many were removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        self.tx.send_if_modified(|list| {
            let before = list.len();
            list.retain(|n| now.saturating_duration_since(n.posted_at) < ttl);
            removed = before - list.len();
            removed > 0
        });
        removed
    }

    /// Snapshot of the active notices, oldest first.
    pub fn active(&self) -> Vec<Notice> {
        self.tx.borrow().clone()
    }

    /// Start observing. The subscription ends when the returned value is dropped.
    pub fn subscribe(&self) -> NoticeSubscription {
        NoticeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// Live view of a [`NoticeBus`].
#[derive(Debug)]
pub struct NoticeSubscription {
    rx: watch::Receiver<Vec<Notice>>,
}

impl NoticeSubscription {
    /// Latest snapshot; marks it as seen.
    pub fn current(&mut self) -> Vec<Notice> {
        self.rx.borrow_and_update().clone()
    }

    /// Return `true` if the list changed since the last [`Self::current`] call.
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next change.
    ///
    /// Fails once the bus has been dropped.
    pub async fn changed(&mut self) -> TwibbonResult<Vec<Notice>> {
        self.rx
            .changed()
            .await
            .map_err(|_| TwibbonError::validation("notice bus closed"))?;
        Ok(self.current())
    }
}

#[cfg(test)]
#[path = "../tests/unit/notice.rs"]
mod tests;
