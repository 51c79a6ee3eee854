//! In-memory record store.
//!
//! Each entity type gets its own [`Repo`]: an id-indexed arena backed by a
//! `DashMap` plus a monotonically increasing counter. The aggregate
//! [`RecordStore`] is constructed once at startup and injected into the
//! services; there is no global singleton.
//!
//! The store gives per-entry atomicity only. Multi-entity mutations (stock
//! decrement + order-item insert + total recompute) are not transactional;
//! this is an accepted limitation for a single-location, low-concurrency POS.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;

use crate::models::{
    Category, DiningTable, EmployeeShift, Expense, InventoryItem, MenuItem, Order, OrderItem,
    Setting, User,
};

/// Id-indexed arena for one entity type.
pub struct Repo<T> {
    entries: DashMap<i64, T>,
    next_id: AtomicI64,
}

impl<T: Clone> Repo<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Allocates the next id and inserts the record built from it.
    pub fn insert(&self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = build(id);
        self.entries.insert(id, record.clone());
        record
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.entries.get(&id).map(|entry| entry.clone())
    }

    /// Applies `mutate` to the record under the map shard lock and returns
    /// the updated copy, or `None` when the id is unknown.
    pub fn update(&self, id: i64, mutate: impl FnOnce(&mut T)) -> Option<T> {
        self.entries.get_mut(&id).map(|mut entry| {
            mutate(entry.value_mut());
            entry.clone()
        })
    }

    pub fn remove(&self, id: i64) -> Option<T> {
        self.entries.remove(&id).map(|(_, record)| record)
    }

    /// All records, unordered. Callers sort when presentation order matters.
    pub fn all(&self) -> Vec<T> {
        self.entries.iter().map(|entry| entry.clone()).collect()
    }

    /// First record matching the predicate, if any.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.entries
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.clone())
    }

    /// All records matching the predicate, unordered.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        self.entries
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every record. Id allocation keeps counting up so cleared ids are
    /// never reused.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl<T: Clone> Default for Repo<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The full set of repositories backing the application.
#[derive(Default)]
pub struct RecordStore {
    pub users: Repo<User>,
    pub categories: Repo<Category>,
    pub menu_items: Repo<MenuItem>,
    pub inventory: Repo<InventoryItem>,
    pub tables: Repo<DiningTable>,
    pub orders: Repo<Order>,
    pub order_items: Repo<OrderItem>,
    pub shifts: Repo<EmployeeShift>,
    pub settings: Repo<Setting>,
    pub expenses: Repo<Expense>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the operational data while keeping users and settings, backing
    /// the reset-database endpoint.
    pub fn reset_operational_data(&self) {
        self.categories.clear();
        self.menu_items.clear();
        self.inventory.clear();
        self.tables.clear();
        self.orders.clear();
        self.order_items.clear();
        self.shifts.clear();
        self.expenses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_allocates_monotonic_ids() {
        let repo: Repo<Category> = Repo::new();
        let a = repo.insert(|id| Category {
            id,
            name: "Hot Beverages".into(),
            description: None,
        });
        let b = repo.insert(|id| Category {
            id,
            name: "Snacks".into(),
            description: None,
        });
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn update_mutates_in_place() {
        let repo: Repo<Category> = Repo::new();
        let cat = repo.insert(|id| Category {
            id,
            name: "Snacks".into(),
            description: None,
        });
        let updated = repo
            .update(cat.id, |c| c.description = Some("Savory items".into()))
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Savory items"));
        assert_eq!(repo.get(cat.id).unwrap().description, updated.description);
    }

    #[test]
    fn clear_does_not_reuse_ids() {
        let repo: Repo<Category> = Repo::new();
        repo.insert(|id| Category {
            id,
            name: "A".into(),
            description: None,
        });
        repo.clear();
        let next = repo.insert(|id| Category {
            id,
            name: "B".into(),
            description: None,
        });
        assert_eq!(next.id, 2);
    }
}
