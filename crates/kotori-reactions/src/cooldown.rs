use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use kotori_types::{PostId, ReactionKind};

/// Delay after a completed toggle before the same stamp accepts another.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(800);

enum Slot {
    InFlight,
    CoolingUntil(Instant),
}

/// Rapid double-click suppression for reaction toggles.
///
/// A `(post, kind)` pair admits one toggle at a time: refused while a round
/// trip is in flight, and for a fixed delay after it completes. A failed
/// round trip is released immediately so the user can retry.
pub struct ToggleGuard {
    cooldown: Duration,
    slots: Mutex<HashMap<(PostId, ReactionKind), Slot>>,
}

impl ToggleGuard {
    pub fn new() -> Self {
        Self::with_cooldown(DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            cooldown,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Try to start a toggle. `false` means refuse: one is already in
    /// flight or the cooldown has not elapsed.
    pub fn try_begin(&self, post: &PostId, kind: ReactionKind) -> bool {
        let mut slots = self.slots.lock().expect("lock poisoned");
        let now = Instant::now();
        // Elapsed cooldowns are dead weight; drop them so the map stays
        // bounded by the number of in-flight and cooling toggles.
        slots.retain(|_, slot| match slot {
            Slot::InFlight => true,
            Slot::CoolingUntil(until) => now < *until,
        });
        let key = (post.clone(), kind);
        match slots.get(&key) {
            Some(Slot::InFlight) => false,
            Some(Slot::CoolingUntil(_)) => false,
            None => {
                slots.insert(key, Slot::InFlight);
                true
            }
        }
    }

    /// Mark the in-flight toggle as finished and start the cooldown.
    pub fn complete(&self, post: &PostId, kind: ReactionKind) {
        let mut slots = self.slots.lock().expect("lock poisoned");
        slots.insert(
            (post.clone(), kind),
            Slot::CoolingUntil(Instant::now() + self.cooldown),
        );
    }

    /// Release the slot without a cooldown (the round trip failed).
    pub fn abort(&self, post: &PostId, kind: ReactionKind) {
        let mut slots = self.slots.lock().expect("lock poisoned");
        slots.remove(&(post.clone(), kind));
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.slots.lock().expect("lock poisoned").len()
    }
}

impl Default for ToggleGuard {
    fn default() -> Self {
        Self::new()
    }
}
