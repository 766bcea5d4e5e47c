//! Hits tagged as entrances or exits.

use std::ops::Deref;

use pierce_scene::HitEvent;

/// A hit known to be either entering or leaving an object.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitAwareHit {
    /// The underlying hit, expressed in the forward cast's frame.
    pub hit: HitEvent,
    /// True if the cast leaves the object here.
    pub is_exit: bool,
}

impl ExitAwareHit {
    /// Tag a hit as an entrance.
    pub fn entrance(hit: HitEvent) -> Self {
        Self {
            hit,
            is_exit: false,
        }
    }

    /// Tag a hit as an exit.
    pub fn exit(hit: HitEvent) -> Self {
        Self { hit, is_exit: true }
    }
}

impl Deref for ExitAwareHit {
    type Target = HitEvent;

    fn deref(&self) -> &HitEvent {
        &self.hit
    }
}

/// Time-ordered entrances and exits of one cast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExitAwareCast {
    /// Entrances and exits in forward order.
    pub hits: Vec<ExitAwareHit>,
    /// Index into `hits` of the entrance that stopped the cast.
    pub stop: Option<usize>,
}

impl ExitAwareCast {
    /// The entrance that stopped the cast, if any.
    pub fn stop_hit(&self) -> Option<&ExitAwareHit> {
        self.stop.and_then(|i| self.hits.get(i))
    }

    /// Number of entrances.
    pub fn entrance_count(&self) -> usize {
        self.hits.iter().filter(|h| !h.is_exit).count()
    }

    /// Number of exits.
    pub fn exit_count(&self) -> usize {
        self.hits.iter().filter(|h| h.is_exit).count()
    }
}
