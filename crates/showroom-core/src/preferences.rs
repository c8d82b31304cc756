//! Favorites and compare lists.
//!
//! The catalog and finance code never touch this; pages inject a
//! [`PreferenceStore`] and react to change notifications.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::{ShowroomError, ShowroomResult};

/// Vehicles side by side on the compare page.
pub const COMPARE_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceList {
    Favorites,
    Compare,
}

impl std::fmt::Display for PreferenceList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Favorites => write!(f, "favorites"),
            Self::Compare => write!(f, "compare"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceChange {
    pub list: PreferenceList,
    pub ids: Vec<String>,
    /// Increases with every change to any list; a listener may discard
    /// a notification older than one it has already seen.
    pub version: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Arc<dyn Fn(&PreferenceChange) + Send + Sync>;

/// Process-wide keyed lists with change notification.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, list: PreferenceList) -> Vec<String>;

    /// Edit the list in place as one atomic step and return the result.
    ///
    /// Duplicates left by `edit` are dropped, first occurrence wins.
    /// Listeners are notified only when the list actually changed.
    fn update(&self, list: PreferenceList, edit: &mut dyn FnMut(&mut Vec<String>)) -> Vec<String>;

    /// Replace the list.
    fn set(&self, list: PreferenceList, ids: Vec<String>) {
        let mut replacement = Some(ids);
        self.update(list, &mut |current: &mut Vec<String>| {
            if let Some(ids) = replacement.take() {
                *current = ids;
            }
        });
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Returns false when the id was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Default)]
struct Lists {
    by_kind: HashMap<PreferenceList, Vec<String>>,
    version: u64,
}

#[derive(Default)]
pub struct InMemoryPreferenceStore {
    lists: Mutex<Lists>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn dedup(ids: &mut Vec<String>) {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.retain(|id| seen.insert(id.clone()));
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, list: PreferenceList) -> Vec<String> {
        lock(&self.lists).by_kind.get(&list).cloned().unwrap_or_default()
    }

    fn update(&self, list: PreferenceList, edit: &mut dyn FnMut(&mut Vec<String>)) -> Vec<String> {
        let change = {
            let mut lists = lock(&self.lists);
            let ids = lists.by_kind.entry(list).or_default();
            let before = ids.clone();
            edit(ids);
            dedup(ids);
            if *ids == before {
                return before;
            }
            let ids = ids.clone();
            lists.version += 1;
            PreferenceChange {
                list,
                ids,
                version: lists.version,
            }
        };

        // Listeners run outside both locks so they may call back into the store.
        let listeners: Vec<Listener> = lock(&self.listeners)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        debug!(
            %list,
            len = change.ids.len(),
            version = change.version,
            listeners = listeners.len(),
            "preference list updated"
        );
        for listener in listeners {
            listener(&change);
        }
        change.ids
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }
}

// ---------------------------------------------------------------------------
// List operations
// ---------------------------------------------------------------------------

/// Add or remove `id`; returns whether it is now a favorite.
pub fn toggle_favorite(store: &dyn PreferenceStore, id: &str) -> bool {
    let mut now_favorite = false;
    store.update(PreferenceList::Favorites, &mut |ids: &mut Vec<String>| {
        match ids.iter().position(|x| x == id) {
            Some(i) => {
                ids.remove(i);
                now_favorite = false;
            }
            None => {
                ids.push(id.to_string());
                now_favorite = true;
            }
        }
    });
    now_favorite
}

pub fn is_favorite(store: &dyn PreferenceStore, id: &str) -> bool {
    store.get(PreferenceList::Favorites).iter().any(|x| x == id)
}

/// Append to the compare list; re-adding an existing id is a no-op.
pub fn add_to_compare(store: &dyn PreferenceStore, id: &str) -> ShowroomResult<Vec<String>> {
    let mut full = false;
    let ids = store.update(PreferenceList::Compare, &mut |ids: &mut Vec<String>| {
        if ids.iter().any(|x| x == id) {
            return;
        }
        if ids.len() >= COMPARE_LIMIT {
            full = true;
            return;
        }
        ids.push(id.to_string());
    });
    if full {
        return Err(ShowroomError::CapacityExceeded {
            list: PreferenceList::Compare.to_string(),
            limit: COMPARE_LIMIT,
        });
    }
    Ok(ids)
}

/// Returns false when `id` was not in the list.
pub fn remove_from_compare(store: &dyn PreferenceStore, id: &str) -> bool {
    let mut removed = false;
    store.update(PreferenceList::Compare, &mut |ids: &mut Vec<String>| {
        let before = ids.len();
        ids.retain(|x| x != id);
        removed = ids.len() != before;
    });
    removed
}

pub fn clear(store: &dyn PreferenceStore, list: PreferenceList) {
    store.set(list, Vec::new());
}
