//! Post-settlement event fan-out.
//!
//! Two planes: a single global feed every observer shares, and one lazily
//! created channel per user id. Publishing is fire-and-forget; a send into a
//! channel with no subscribers is not an error, and a slow subscriber lags
//! (and later observes `RecvError::Lagged`) rather than blocking the
//! publisher.

use std::collections::HashMap;
use std::sync::RwLock;

use casedrop_types::events::OutboundEvent;
use casedrop_types::UserId;
use tokio::sync::broadcast;

pub struct OutcomeBroadcaster {
    global: broadcast::Sender<OutboundEvent>,
    user_channels: RwLock<HashMap<UserId, broadcast::Sender<OutboundEvent>>>,
    user_capacity: usize,
}

impl OutcomeBroadcaster {
    pub fn new(global_capacity: usize, user_capacity: usize) -> Self {
        let (global, _) = broadcast::channel(global_capacity);
        Self {
            global,
            user_channels: RwLock::new(HashMap::new()),
            user_capacity,
        }
    }

    pub fn subscribe_global(&self) -> broadcast::Receiver<OutboundEvent> {
        self.global.subscribe()
    }

    pub fn subscribe_user(&self, user_id: &str) -> broadcast::Receiver<OutboundEvent> {
        if let Some(sender) = self
            .user_channels
            .read()
            .expect("user channels lock poisoned")
            .get(user_id)
        {
            return sender.subscribe();
        }
        let mut channels = self
            .user_channels
            .write()
            .expect("user channels lock poisoned");
        channels
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(self.user_capacity).0)
            .subscribe()
    }

    /// Publishes to the global feed. Returns how many subscribers received it.
    pub fn publish_global(&self, event: OutboundEvent) -> usize {
        self.global.send(event).unwrap_or(0)
    }

    /// Publishes to one user's channel. A user with no channel (never
    /// subscribed) simply receives nothing.
    pub fn publish_user(&self, user_id: &str, event: OutboundEvent) -> usize {
        let channels = self
            .user_channels
            .read()
            .expect("user channels lock poisoned");
        match channels.get(user_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedrop_types::events::{CaseOpenedEvent, UserDataUpdatedEvent};
    use casedrop_types::UserSummary;

    fn opened() -> OutboundEvent {
        OutboundEvent::CaseOpened(CaseOpenedEvent {
            winning_items: Vec::new(),
            user: UserSummary {
                name: "alice".into(),
                id: "u1".into(),
                profile_picture: String::new(),
            },
            case_image: "case.png".into(),
        })
    }

    fn updated(user_id: &str) -> OutboundEvent {
        OutboundEvent::UserDataUpdated {
            user_id: user_id.into(),
            data: UserDataUpdatedEvent {
                wallet_balance: 0,
                xp: 10,
                level: 1,
            },
        }
    }

    #[test]
    fn global_feed_reaches_every_subscriber() {
        let broadcaster = OutcomeBroadcaster::new(8, 8);
        let mut a = broadcaster.subscribe_global();
        let mut b = broadcaster.subscribe_global();
        assert_eq!(broadcaster.publish_global(opened()), 2);
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn user_events_stay_user_scoped() {
        let broadcaster = OutcomeBroadcaster::new(8, 8);
        let mut mine = broadcaster.subscribe_user("u1");
        let mut theirs = broadcaster.subscribe_user("u2");
        assert_eq!(broadcaster.publish_user("u1", updated("u1")), 1);
        assert!(mine.try_recv().is_ok());
        assert!(theirs.try_recv().is_err());
    }

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let broadcaster = OutcomeBroadcaster::new(8, 8);
        assert_eq!(broadcaster.publish_global(opened()), 0);
        assert_eq!(broadcaster.publish_user("nobody", updated("nobody")), 0);
    }
}
