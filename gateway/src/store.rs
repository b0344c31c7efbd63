//! In-memory catalog and user stores.
//!
//! The user store is the settlement boundary: each user record sits behind
//! its own mutex, and `settle` performs the conditional debit, the inventory
//! prepend, and the leveling update inside one critical section. Either all
//! of those apply or none do; two concurrent settlements against the same
//! balance serialize on the user's lock, so the second observes the first's
//! debit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use casedrop_engine::LevelingPolicy;
use casedrop_types::{Case, CaseId, GamesError, Item, User, UserId, UserSummary};

/// Read-mostly case catalog, keyed by case id.
#[derive(Default)]
pub struct CatalogStore {
    cases: RwLock<HashMap<CaseId, Arc<Case>>>,
}

impl CatalogStore {
    pub fn insert(&self, case: Case) {
        self.cases
            .write()
            .expect("catalog lock poisoned")
            .insert(case.id.clone(), Arc::new(case));
    }

    pub fn get(&self, id: &str) -> Option<Arc<Case>> {
        self.cases
            .read()
            .expect("catalog lock poisoned")
            .get(id)
            .cloned()
    }

    /// All cases, sorted by id for a stable listing.
    pub fn list(&self) -> Vec<Arc<Case>> {
        let mut cases = self
            .cases
            .read()
            .expect("catalog lock poisoned")
            .values()
            .cloned()
            .collect::<Vec<_>>();
        cases.sort_by(|a, b| a.id.cmp(&b.id));
        cases
    }

    pub fn len(&self) -> usize {
        self.cases.read().expect("catalog lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Post-settlement snapshot, taken while the user's lock is still held.
#[derive(Clone, Debug)]
pub struct SettledUser {
    pub summary: UserSummary,
    pub wallet_balance: u64,
    pub xp: u64,
    pub level: u32,
}

#[derive(Default)]
pub struct UserStore {
    users: RwLock<HashMap<UserId, Arc<Mutex<User>>>>,
}

impl UserStore {
    pub fn insert(&self, user: User) {
        self.users
            .write()
            .expect("user map lock poisoned")
            .insert(user.id.clone(), Arc::new(Mutex::new(user)));
    }

    fn record(&self, id: &str) -> Option<Arc<Mutex<User>>> {
        self.users
            .read()
            .expect("user map lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users
            .read()
            .expect("user map lock poisoned")
            .contains_key(id)
    }

    /// A point-in-time copy of the user record.
    pub fn snapshot(&self, id: &str) -> Option<User> {
        let record = self.record(id)?;
        let user = record.lock().expect("user lock poisoned");
        Some(user.clone())
    }

    pub fn balance_of(&self, id: &str) -> Option<u64> {
        let record = self.record(id)?;
        let user = record.lock().expect("user lock poisoned");
        Some(user.wallet_balance)
    }

    /// Applies one settled opening to the user: verifies the balance covers
    /// `total_cost` at this instant, debits it, prepends `items` to the
    /// inventory (most recent first, batch order preserved), and advances
    /// experience and level through `policy`.
    ///
    /// Fails with `InsufficientBalance` without touching the record if the
    /// balance no longer covers the cost.
    pub fn settle(
        &self,
        id: &str,
        total_cost: u64,
        items: &[Item],
        policy: &dyn LevelingPolicy,
    ) -> Result<SettledUser, GamesError> {
        let record = self.record(id).ok_or(GamesError::UserNotFound)?;
        let mut user = record.lock().expect("user lock poisoned");

        if user.wallet_balance < total_cost {
            return Err(GamesError::InsufficientBalance);
        }
        user.wallet_balance -= total_cost;
        user.inventory.splice(0..0, items.iter().cloned());
        let (xp, level) = policy.progress(user.xp, user.level, total_cost);
        user.xp = xp;
        user.level = level;

        Ok(SettledUser {
            summary: user.summary(),
            wallet_balance: user.wallet_balance,
            xp: user.xp,
            level: user.level,
        })
    }
}
