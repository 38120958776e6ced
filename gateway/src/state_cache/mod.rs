use std::sync::RwLock;

use alloy::primitives::U256;
use chrono::{DateTime, Utc};

use crate::models::PoolState;

/// A cached value and when it was stored.
#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    updated_at: DateTime<Utc>,
}

/// Latest pool state and native price, written by the refresher and read by
/// request handlers.
///
/// Each field sits behind its own lock so a price update never blocks pool
/// state readers and the other way round. Getters hand out clones; callers
/// can never reach the cached instance.
#[derive(Debug, Default)]
pub struct StateCache {
    pool_state: RwLock<Option<Entry<PoolState>>>,
    native_price: RwLock<Option<Entry<U256>>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pool_state(&self, state: PoolState) {
        store(&self.pool_state, state);
    }

    /// `None` until the first successful refresh.
    pub fn get_pool_state(&self) -> Option<PoolState> {
        load(&self.pool_state).map(|entry| entry.value)
    }

    pub fn pool_state_updated_at(&self) -> Option<DateTime<Utc>> {
        load(&self.pool_state).map(|entry| entry.updated_at)
    }

    pub fn set_native_price(&self, price: U256) {
        store(&self.native_price, price);
    }

    /// `None` until the first successful refresh.
    pub fn get_native_price(&self) -> Option<U256> {
        load(&self.native_price).map(|entry| entry.value)
    }

    pub fn native_price_updated_at(&self) -> Option<DateTime<Utc>> {
        load(&self.native_price).map(|entry| entry.updated_at)
    }
}

fn store<T>(slot: &RwLock<Option<Entry<T>>>, value: T) {
    let entry = Entry {
        value,
        updated_at: Utc::now(),
    };
    // A poisoned lock still holds a whole value: writers only ever swap it.
    let mut guard = slot.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(entry);
}

fn load<T: Clone>(slot: &RwLock<Option<Entry<T>>>) -> Option<Entry<T>> {
    slot.read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}
