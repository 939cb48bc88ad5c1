use media_scout_models::{MediaType, WatchedKey};
use media_scout_sources::WatchedStore;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Session phase of the watched-state manager for the current identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No resolved identity: lookups are false, toggles are no-ops
    Unauthenticated,
    /// Identity changed, full list fetch in flight
    Loading,
    /// List fetch settled (possibly failed open to empty)
    Ready,
}

/// What a toggle call did. Remote failures are absorbed here (the set is
/// reverted), never raised as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Remote mutation failed; the optimistic change was rolled back
    Reverted,
    /// A mutation for this key is already in flight; nothing was changed
    Pending,
    /// No resolved identity; nothing was changed
    SignedOut,
}

struct WatchedState {
    user_id: Option<String>,
    phase: SessionPhase,
    keys: HashSet<WatchedKey>,
    in_flight: HashSet<WatchedKey>,
    /// Bumped on every identity change; a list fetch only commits its result
    /// while its captured generation is still current.
    generation: u64,
}

/// Authoritative local view of one user's watched titles, backed by a remote
/// document store. Mutations are optimistic: the in-memory set flips first,
/// the remote call follows, and a failed call rolls the flip back.
///
/// The identity is an explicit input (`set_user`); the manager never reads it
/// from ambient state. Consumers read through `is_watched` and snapshot
/// accessors and mutate only through `toggle_watched`.
pub struct WatchedManager {
    store: Arc<dyn WatchedStore>,
    state: Mutex<WatchedState>,
}

impl WatchedManager {
    pub fn new(store: Arc<dyn WatchedStore>) -> Self {
        Self {
            store,
            state: Mutex::new(WatchedState {
                user_id: None,
                phase: SessionPhase::Unauthenticated,
                keys: HashSet::new(),
                in_flight: HashSet::new(),
                generation: 0,
            }),
        }
    }

    /// Re-initialize for a new identity. `None` means signed out: the set
    /// empties and mutations become no-ops. Otherwise the set is cleared and
    /// reloaded wholesale from the store; a load that fails leaves the empty
    /// set in place (fail open) rather than blocking.
    ///
    /// Calling again with a new identity while a previous load is still in
    /// flight invalidates that load; its late response is discarded.
    pub async fn set_user(&self, user_id: Option<&str>) {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.user_id = user_id.map(str::to_string);
            state.keys.clear();
            state.in_flight.clear();
            state.phase = match user_id {
                Some(_) => SessionPhase::Loading,
                None => SessionPhase::Unauthenticated,
            };
            state.generation
        };

        let Some(user_id) = user_id else {
            debug!("Signed out, watched set cleared");
            return;
        };

        let keys = match self.store.list_watched(user_id).await {
            Ok(entries) => {
                let keys: HashSet<WatchedKey> = entries.iter().map(|e| e.key()).collect();
                info!("Loaded {} watched entries for user {}", keys.len(), user_id);
                keys
            }
            Err(e) => {
                // Fail open to "nothing watched" instead of blocking the session
                warn!("Failed to load watched list for user {}: {}", user_id, e);
                HashSet::new()
            }
        };

        let mut state = self.lock();
        if state.generation != generation {
            debug!("Discarding stale watched list for user {}", user_id);
            return;
        }
        state.keys = keys;
        state.phase = SessionPhase::Ready;
    }

    /// Pure membership lookup against the in-memory set. No I/O.
    pub fn is_watched(&self, media_type: MediaType, media_id: u64) -> bool {
        self.lock().keys.contains(&WatchedKey::new(media_type, media_id))
    }

    pub fn watched_count(&self) -> usize {
        self.lock().keys.len()
    }

    /// Snapshot of the current set, for hydrating a watched-only view
    pub fn watched_keys(&self) -> Vec<WatchedKey> {
        let mut keys: Vec<WatchedKey> = self.lock().keys.iter().copied().collect();
        keys.sort_by_key(|k| (k.media_type.as_str(), k.media_id));
        keys
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    pub fn current_user(&self) -> Option<String> {
        self.lock().user_id.clone()
    }

    /// Flip membership for the key: present means removal, absent means
    /// addition. The set changes immediately; the matching remote mutation
    /// follows, and on failure the change is rolled back. At most one
    /// mutation may be in flight per key; an overlapping toggle is rejected
    /// with `Pending`.
    pub async fn toggle_watched(&self, media_type: MediaType, media_id: u64) -> ToggleOutcome {
        let key = WatchedKey::new(media_type, media_id);

        let (user_id, generation, removing) = {
            let mut state = self.lock();
            let Some(user_id) = state.user_id.clone() else {
                debug!("Ignoring toggle for {} while signed out", key);
                return ToggleOutcome::SignedOut;
            };
            if state.in_flight.contains(&key) {
                debug!("Rejecting toggle for {}: mutation already in flight", key);
                return ToggleOutcome::Pending;
            }
            state.in_flight.insert(key);

            let removing = state.keys.contains(&key);
            if removing {
                state.keys.remove(&key);
            } else {
                state.keys.insert(key);
            }
            (user_id, state.generation, removing)
        };

        let result = if removing {
            match self.store.remove_watched(&user_id, media_type, media_id).await {
                // Not found remotely: the entry is gone either way, so the
                // optimistic removal already matches the store
                Ok(false) => {
                    debug!("No remote document for {}, nothing to delete", key);
                    Ok(())
                }
                Ok(true) => Ok(()),
                Err(e) => Err(e),
            }
        } else {
            self.store
                .add_watched(&user_id, media_type, media_id)
                .await
                .map(|_| ())
        };

        let mut state = self.lock();
        state.in_flight.remove(&key);
        match result {
            Ok(()) => {
                if removing {
                    ToggleOutcome::Removed
                } else {
                    ToggleOutcome::Added
                }
            }
            Err(e) => {
                warn!("Remote mutation for {} failed, reverting: {}", key, e);
                // Only touch the set if this session is still current; after
                // an identity change the set belongs to the new user.
                if state.generation == generation {
                    if removing {
                        state.keys.insert(key);
                    } else {
                        state.keys.remove(&key);
                    }
                }
                ToggleOutcome::Reverted
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WatchedState> {
        // The state mutex is never held across an await point
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
