//! The casedrop gateway: HTTP/WS surface, settlement, and event fan-out.
//!
//! The gateway owns the in-memory stores and wires the draw engine to them.
//! One opening request flows: authenticate, look up the case, validate the
//! quantity, run the draws, settle atomically against the wallet, respond,
//! and only then broadcast the outcome events.

use std::sync::Arc;

use casedrop_engine::{DrawError, DrawRng, LevelingPolicy, SelectError, SpendLeveling, StdDraw};
use casedrop_types::events::{CaseOpenedEvent, OutboundEvent, UserDataUpdatedEvent};
use casedrop_types::{DrawResult, GamesError};

pub mod api;
mod auth;
mod broadcast;
mod config;
mod games;
mod metrics;
mod store;

pub use api::Api;
pub use auth::{Authenticator, TokenRegistry};
pub use broadcast::OutcomeBroadcaster;
pub use config::GatewayConfig;
pub use games::{SlotGame, UpgradeGame};
pub use metrics::{HttpMetrics, HttpMetricsSnapshot};
pub use store::{CatalogStore, SettledUser, UserStore};

pub struct Gateway {
    pub config: GatewayConfig,
    catalog: CatalogStore,
    users: UserStore,
    broadcaster: OutcomeBroadcaster,
    auth: Arc<dyn Authenticator>,
    leveling: Box<dyn LevelingPolicy>,
    upgrade_game: Option<Arc<dyn UpgradeGame>>,
    slot_game: Option<Arc<dyn SlotGame>>,
    http_metrics: HttpMetrics,
}

impl Gateway {
    pub fn new(config: GatewayConfig, auth: Arc<dyn Authenticator>) -> Self {
        let broadcaster =
            OutcomeBroadcaster::new(config.broadcast_capacity, config.user_channel_capacity);
        Self {
            config,
            catalog: CatalogStore::default(),
            users: UserStore::default(),
            broadcaster,
            auth,
            leveling: Box::new(SpendLeveling),
            upgrade_game: None,
            slot_game: None,
            http_metrics: HttpMetrics::default(),
        }
    }

    pub fn with_upgrade_game(mut self, game: Arc<dyn UpgradeGame>) -> Self {
        self.upgrade_game = Some(game);
        self
    }

    pub fn with_slot_game(mut self, game: Arc<dyn SlotGame>) -> Self {
        self.slot_game = Some(game);
        self
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn broadcaster(&self) -> &OutcomeBroadcaster {
        &self.broadcaster
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.auth.as_ref()
    }

    pub fn upgrade_game(&self) -> Option<&Arc<dyn UpgradeGame>> {
        self.upgrade_game.as_ref()
    }

    pub fn slot_game(&self) -> Option<&Arc<dyn SlotGame>> {
        self.slot_game.as_ref()
    }

    pub fn http_metrics(&self) -> &HttpMetrics {
        &self.http_metrics
    }

    /// Opens `quantity` units of the case for the user, using the process
    /// RNG. See [`Gateway::open_case_with_rng`].
    pub fn open_case(
        &self,
        user_id: &str,
        case_id: &str,
        quantity: f64,
    ) -> Result<DrawResult, GamesError> {
        self.open_case_with_rng(user_id, case_id, quantity, &mut StdDraw(rand::thread_rng()))
    }

    /// The full opening pipeline against an injected RNG.
    ///
    /// Validation runs in a fixed order: case lookup, user lookup, quantity,
    /// then an advisory balance check. All of it happens before the RNG is
    /// touched, so a rejected request consumes no randomness. The balance is
    /// verified again inside settlement, which is the authoritative check.
    /// Events go out only after the settlement has committed.
    pub fn open_case_with_rng(
        &self,
        user_id: &str,
        case_id: &str,
        quantity: f64,
        rng: &mut impl DrawRng,
    ) -> Result<DrawResult, GamesError> {
        let case = self.catalog.get(case_id).ok_or(GamesError::CaseNotFound)?;
        let validated =
            casedrop_engine::validate_quantity(quantity).map_err(|_| GamesError::InvalidQuantity)?;
        let total_cost = case.total_cost(validated);
        match self.users.balance_of(user_id) {
            None => return Err(GamesError::UserNotFound),
            Some(balance) if balance < total_cost => {
                return Err(GamesError::InsufficientBalance)
            }
            Some(_) => {}
        }

        let items = casedrop_engine::draw(&case, &self.config.rarity_tiers, quantity, rng)
            .map_err(|e| match e {
                DrawError::InvalidQuantity => GamesError::InvalidQuantity,
                DrawError::Select(SelectError::NoDrawableItems) => GamesError::NoDrawableItems {
                    case_id: case.id.clone(),
                },
            })?;

        let settled = self
            .users
            .settle(user_id, total_cost, &items, self.leveling.as_ref())?;
        tracing::info!(
            user_id = %user_id,
            case_id = %case.id,
            quantity = validated,
            total_cost = total_cost,
            balance = settled.wallet_balance,
            "case.opened"
        );

        self.publish_outcome(&case.image, &settled, &items);

        Ok(DrawResult {
            user_id: user_id.to_string(),
            items,
            total_cost,
        })
    }

    fn publish_outcome(
        &self,
        case_image: &str,
        settled: &SettledUser,
        items: &[casedrop_types::Item],
    ) {
        let user_id = settled.summary.id.clone();
        let opened = OutboundEvent::CaseOpened(CaseOpenedEvent {
            winning_items: items.to_vec(),
            user: settled.summary.clone(),
            case_image: case_image.to_string(),
        });
        let updated = OutboundEvent::UserDataUpdated {
            user_id: user_id.clone(),
            data: UserDataUpdatedEvent {
                wallet_balance: settled.wallet_balance,
                xp: settled.xp,
                level: settled.level,
            },
        };

        // Best effort: a channel with no subscribers drops the event.
        let delivered = self.broadcaster.publish_global(opened);
        if delivered == 0 {
            self.http_metrics.inc_dropped_events();
        } else {
            self.http_metrics.add_events_published(1);
        }
        let delivered = self.broadcaster.publish_user(&user_id, updated);
        if delivered == 0 {
            self.http_metrics.inc_dropped_events();
        } else {
            self.http_metrics.add_events_published(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casedrop_engine::SequenceRng;
    use casedrop_types::{Case, Item, RarityId, User};

    fn item(id: &str, rarity: RarityId) -> Item {
        Item {
            id: id.into(),
            name: id.to_ascii_uppercase(),
            image: format!("{id}.png"),
            rarity,
        }
    }

    fn starter_case() -> Case {
        Case {
            id: "c1".into(),
            name: "Starter".into(),
            image: "c1.png".into(),
            price: 10,
            items: vec![
                item("i1", 1),
                item("i2", 2),
                item("i3", 3),
                item("i4", 4),
                item("i5", 5),
            ],
        }
    }

    fn gateway_with_balance(balance: u64) -> Gateway {
        let gateway = Gateway::new(GatewayConfig::default(), Arc::new(TokenRegistry::default()));
        gateway.catalog().insert(starter_case());
        gateway.users().insert(User::new("u1", "alice", balance));
        gateway
    }

    #[test]
    fn full_batch_drains_wallet_and_broadcasts() {
        let gateway = gateway_with_balance(50);
        let mut feed = gateway.broadcaster().subscribe_global();
        let mut updates = gateway.broadcaster().subscribe_user("u1");

        let mut rng = SequenceRng::zeroes();
        let result = gateway
            .open_case_with_rng("u1", "c1", 5.0, &mut rng)
            .expect("opening succeeds");

        assert_eq!(result.items.len(), 5);
        assert_eq!(result.total_cost, 50);

        let snapshot = gateway.users().snapshot("u1").unwrap();
        assert_eq!(snapshot.wallet_balance, 0);
        assert_eq!(snapshot.xp, 50);
        assert_eq!(snapshot.inventory.len(), 5);

        let opened = feed.try_recv().expect("global event published");
        match opened {
            OutboundEvent::CaseOpened(event) => {
                let won: Vec<&str> = event.winning_items.iter().map(|i| i.id.as_str()).collect();
                let responded: Vec<&str> = result.items.iter().map(|i| i.id.as_str()).collect();
                assert_eq!(won, responded);
                assert_eq!(event.case_image, "c1.png");
                assert_eq!(event.user.id, "u1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        let updated = updates.try_recv().expect("user event published");
        match updated {
            OutboundEvent::UserDataUpdated { user_id, data } => {
                assert_eq!(user_id, "u1");
                assert_eq!(data.wallet_balance, 0);
                assert_eq!(data.xp, 50);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn insufficient_balance_is_all_or_nothing() {
        let gateway = gateway_with_balance(5);
        let mut feed = gateway.broadcaster().subscribe_global();
        let mut updates = gateway.broadcaster().subscribe_user("u1");

        let mut rng = SequenceRng::zeroes();
        let err = gateway
            .open_case_with_rng("u1", "c1", 1.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GamesError::InsufficientBalance));

        let snapshot = gateway.users().snapshot("u1").unwrap();
        assert_eq!(snapshot.wallet_balance, 5);
        assert!(snapshot.inventory.is_empty());
        assert_eq!(snapshot.xp, 0);
        assert!(feed.try_recv().is_err());
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn unknown_case_reported_before_quantity() {
        let gateway = gateway_with_balance(50);
        let mut rng = SequenceRng::zeroes();
        let err = gateway
            .open_case_with_rng("u1", "missing", 99.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GamesError::CaseNotFound));
    }

    #[test]
    fn unknown_user_is_reported() {
        let gateway = gateway_with_balance(50);
        let mut rng = SequenceRng::zeroes();
        let err = gateway
            .open_case_with_rng("ghost", "c1", 1.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GamesError::UserNotFound));
    }

    #[test]
    fn invalid_quantities_leave_state_untouched() {
        let gateway = gateway_with_balance(50);
        let mut feed = gateway.broadcaster().subscribe_global();
        for quantity in [0.0, 6.0, 2.5, -1.0, f64::NAN] {
            let mut rng = SequenceRng::zeroes();
            let err = gateway
                .open_case_with_rng("u1", "c1", quantity, &mut rng)
                .unwrap_err();
            assert!(matches!(err, GamesError::InvalidQuantity), "quantity {quantity}");
        }
        let snapshot = gateway.users().snapshot("u1").unwrap();
        assert_eq!(snapshot.wallet_balance, 50);
        assert!(snapshot.inventory.is_empty());
        assert!(feed.try_recv().is_err());
    }

    #[test]
    fn user_events_do_not_leak_to_other_users() {
        let gateway = gateway_with_balance(50);
        let mut other = gateway.broadcaster().subscribe_user("u2");
        let mut rng = SequenceRng::zeroes();
        gateway
            .open_case_with_rng("u1", "c1", 1.0, &mut rng)
            .expect("opening succeeds");
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn empty_case_is_a_server_fault() {
        let gateway = gateway_with_balance(50);
        gateway.catalog().insert(Case {
            id: "hollow".into(),
            name: "Hollow".into(),
            image: "hollow.png".into(),
            price: 10,
            items: Vec::new(),
        });
        let mut rng = SequenceRng::zeroes();
        let err = gateway
            .open_case_with_rng("u1", "hollow", 1.0, &mut rng)
            .unwrap_err();
        assert!(matches!(err, GamesError::NoDrawableItems { ref case_id } if case_id == "hollow"));
        let snapshot = gateway.users().snapshot("u1").unwrap();
        assert_eq!(snapshot.wallet_balance, 50);
    }
}
