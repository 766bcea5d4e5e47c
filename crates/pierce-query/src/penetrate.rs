//! Entrance-only penetrating casts.

use pierce_scene::{CollisionResponse, HitEvent, SceneCast, SceneCastRequest};

/// Entrances found by [`penetration_scene_cast`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenetrationCast {
    /// Entrances in order of distance.
    pub hits: Vec<HitEvent>,
    /// Index of the impenetrable entrance the list was cut after.
    pub stop: Option<usize>,
}

impl PenetrationCast {
    /// The impenetrable entrance, if any.
    pub fn stop_hit(&self) -> Option<&HitEvent> {
        self.stop.and_then(|i| self.hits.get(i))
    }
}

/// Re-derive blocking/overlap for hits found with every block turned into an overlap.
///
/// Hits whose real response is ignore, or that the request's params filter
/// out, are dropped.
pub fn reclassify_hits<S: SceneCast + ?Sized>(
    scene: &S,
    request: &SceneCastRequest,
    hits: Vec<HitEvent>,
) -> Vec<HitEvent> {
    hits.into_iter()
        .filter_map(|mut hit| {
            let Some(body) = scene.body(hit.object) else {
                log::warn!("Scene returned a hit on unknown object {:?}", hit.object);
                return None;
            };
            match body.combined_response(request.channel, &request.responses) {
                CollisionResponse::Ignore => None,
                CollisionResponse::Overlap if request.params.ignore_touches => None,
                CollisionResponse::Block if request.params.ignore_blocks => None,
                response => {
                    hit.blocking = response == CollisionResponse::Block;
                    Some(hit)
                }
            }
        })
        .collect()
}

/// Cast through everything from `request.start` to `request.end`.
///
/// Every block response is overridden to overlap so the scene reports all
/// crossings, then each hit gets its real classification back. The first
/// hit `is_impenetrable` accepts ends the cast: later hits are dropped and
/// its index is returned. Hits the cast started inside are never offered to
/// `is_impenetrable`.
pub fn penetration_scene_cast<S, F>(
    scene: &S,
    request: &SceneCastRequest,
    mut is_impenetrable: F,
) -> PenetrationCast
where
    S: SceneCast + ?Sized,
    F: FnMut(&HitEvent) -> bool,
{
    let mut probe = request.clone();
    probe
        .responses
        .replace(CollisionResponse::Block, CollisionResponse::Overlap);
    probe.params.ignore_touches = false;
    probe.params.ignore_blocks = false;

    let mut hits = reclassify_hits(scene, request, scene.cast_multi(&probe));
    let stop = hits
        .iter()
        .position(|hit| !hit.start_penetrating && is_impenetrable(hit));
    if let Some(stop) = stop {
        hits.truncate(stop + 1);
    }
    PenetrationCast { hits, stop }
}
