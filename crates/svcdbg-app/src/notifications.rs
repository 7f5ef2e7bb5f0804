//! Timed notification queue
//!
//! Items expire after a fixed duration unless kept (focused). The queue never owns
//! a timer itself: each operation returns the [`TimerCommand`] the engine has to
//! carry out, and a firing is only honoured while its token is the item's live
//! token. An item therefore has at most one live timer at any time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use svcdbg_core::NetworkFailure;

/// Default lifetime of a notification
pub const DEFAULT_EXPIRE_AFTER: Duration = Duration::from_millis(4_000);

/// Monotonic, process-wide notification id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

/// Identity of one expiry timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

static NOTIFICATION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static TIMER_TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    NotificationId(NOTIFICATION_ID_COUNTER.fetch_add(1, Ordering::SeqCst))
}

fn next_timer_token() -> TimerToken {
    TimerToken(TIMER_TOKEN_COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    Network(NetworkFailure),
    Info(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: NotificationId,
    pub payload: NotificationPayload,
    timer: Option<TimerToken>,
}

impl NotificationItem {
    pub fn has_live_timer(&self) -> bool {
        self.timer.is_some()
    }

    pub fn is_kept(&self) -> bool {
        self.timer.is_none()
    }
}

/// Timer work requested by a queue operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Fire `NotificationTimerFired { id, token }` after `after`
    Start {
        id: NotificationId,
        token: TimerToken,
        after: Duration,
    },
    /// Abort the timer identified by `token`
    Cancel { token: TimerToken },
}

#[derive(Debug, Clone)]
pub struct NotificationQueue {
    items: VecDeque<NotificationItem>,
    expire_after: Duration,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRE_AFTER)
    }
}

impl NotificationQueue {
    pub fn new(expire_after: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            expire_after,
        }
    }

    pub fn set_expire_after(&mut self, expire_after: Duration) {
        self.expire_after = expire_after;
    }

    /// Append an item and start its timer.
    pub fn push(&mut self, payload: NotificationPayload) -> (NotificationId, TimerCommand) {
        let id = next_notification_id();
        let token = next_timer_token();
        self.items.push_back(NotificationItem {
            id,
            payload,
            timer: Some(token),
        });
        (
            id,
            TimerCommand::Start {
                id,
                token,
                after: self.expire_after,
            },
        )
    }

    /// Stop the item's timer without removing it.
    pub fn keep(&mut self, id: NotificationId) -> Option<TimerCommand> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.timer.take().map(|token| TimerCommand::Cancel { token })
    }

    /// Restart the item's timer unless one is already running.
    pub fn release(&mut self, id: NotificationId) -> Option<TimerCommand> {
        let expire_after = self.expire_after;
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        if item.timer.is_some() {
            return None;
        }
        let token = next_timer_token();
        item.timer = Some(token);
        Some(TimerCommand::Start {
            id,
            token,
            after: expire_after,
        })
    }

    /// Remove the item unconditionally. Returns the cancel command for its live
    /// timer, if any.
    pub fn expire(&mut self, id: NotificationId) -> Option<TimerCommand> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let item = self.items.remove(index)?;
        item.timer.map(|token| TimerCommand::Cancel { token })
    }

    /// Apply a timer firing. Stale tokens (cancelled or superseded) are ignored.
    pub fn timer_fired(&mut self, id: NotificationId, token: TimerToken) -> bool {
        let live = self
            .items
            .iter()
            .any(|item| item.id == id && item.timer == Some(token));
        if live {
            self.items.retain(|item| item.id != id);
        }
        live
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    /// Id of the item at `index` in creation order.
    pub fn id_at(&self, index: usize) -> Option<NotificationId> {
        self.items.get(index).map(|item| item.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items with a running timer.
    pub fn live_timers(&self) -> usize {
        self.items.iter().filter(|item| item.has_live_timer()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(text: &str) -> NotificationPayload {
        NotificationPayload::Info(text.to_string())
    }

    #[test]
    fn test_push_starts_timer() {
        let mut queue = NotificationQueue::default();
        let (id, cmd) = queue.push(info("a"));
        assert!(matches!(cmd, TimerCommand::Start { id: started, after, .. }
            if started == id && after == DEFAULT_EXPIRE_AFTER));
        assert_eq!(queue.live_timers(), 1);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut queue = NotificationQueue::default();
        let (a, _) = queue.push(info("a"));
        let (b, _) = queue.push(info("b"));
        assert!(b > a);
        assert_eq!(queue.id_at(0), Some(a));
    }

    #[test]
    fn test_keep_then_expire_other() {
        let mut queue = NotificationQueue::default();
        let (a, _) = queue.push(info("a"));
        let (b, _) = queue.push(info("b"));

        assert!(matches!(queue.keep(a), Some(TimerCommand::Cancel { .. })));
        assert!(matches!(queue.expire(b), Some(TimerCommand::Cancel { .. })));

        assert_eq!(queue.len(), 1);
        let item = queue.get(a).unwrap();
        assert_eq!(item.payload, info("a"));
        assert!(!item.has_live_timer());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut queue = NotificationQueue::default();
        let (a, _) = queue.push(info("a"));
        queue.keep(a);

        assert!(matches!(queue.release(a), Some(TimerCommand::Start { .. })));
        assert_eq!(queue.release(a), None);
        assert_eq!(queue.release(a), None);
        assert_eq!(queue.live_timers(), 1);
    }

    #[test]
    fn test_hover_storm_keeps_single_timer() {
        let mut queue = NotificationQueue::default();
        let (a, _) = queue.push(info("a"));
        let mut started = 0;
        let mut cancelled = 0;
        for _ in 0..50 {
            for cmd in [queue.keep(a), queue.release(a), queue.release(a)]
                .into_iter()
                .flatten()
            {
                match cmd {
                    TimerCommand::Start { .. } => started += 1,
                    TimerCommand::Cancel { .. } => cancelled += 1,
                }
            }
        }
        // One initial timer from push plus every restart, minus every cancel.
        assert_eq!(1 + started - cancelled, 1);
        assert_eq!(queue.live_timers(), 1);
    }

    #[test]
    fn test_cancelled_timer_firing_is_ignored() {
        let mut queue = NotificationQueue::default();
        let (a, cmd) = queue.push(info("a"));
        let TimerCommand::Start { token, .. } = cmd else {
            panic!("expected start");
        };
        queue.keep(a);
        assert!(!queue.timer_fired(a, token));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_superseded_timer_firing_is_ignored() {
        let mut queue = NotificationQueue::default();
        let (a, first) = queue.push(info("a"));
        let TimerCommand::Start { token: old, .. } = first else {
            panic!("expected start");
        };
        queue.keep(a);
        let Some(TimerCommand::Start { token: new, .. }) = queue.release(a) else {
            panic!("expected restart");
        };
        assert!(!queue.timer_fired(a, old));
        assert!(queue.timer_fired(a, new));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expire_kept_item_has_no_cancel() {
        let mut queue = NotificationQueue::default();
        let (a, _) = queue.push(info("a"));
        queue.keep(a);
        assert_eq!(queue.expire(a), None);
        assert!(queue.is_empty());
        assert_eq!(queue.expire(a), None);
    }

    #[test]
    fn test_operations_on_missing_item() {
        let mut queue = NotificationQueue::default();
        let missing = NotificationId(u64::MAX);
        assert_eq!(queue.keep(missing), None);
        assert_eq!(queue.release(missing), None);
        assert!(!queue.timer_fired(missing, TimerToken(1)));
    }
}
