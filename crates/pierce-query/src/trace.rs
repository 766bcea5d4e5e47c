//! Re-framing hits into a different trace.
//!
//! A hit found by one cast can be expressed relative to another collinear
//! cast by sliding the trace's start and end along its direction. The hit's
//! world position does not change, only its time and distance.

use pierce_math::safe_normal;
use pierce_scene::HitEvent;

/// Slack allowed on the `[0, 1]` range of a remapped time.
const TIME_TOLERANCE: f32 = 1e-4;

/// Length of the trace that produced `hit`.
///
/// Derived from distance over time when possible, which stays exact after
/// sliding. Falls back to the trace endpoints for a hit at time zero.
pub fn trace_length(hit: &HitEvent) -> f32 {
    if hit.time > 0.0 {
        hit.distance / hit.time
    } else {
        (hit.trace_end - hit.trace_start).norm()
    }
}

/// Slide the trace of `hit` so it runs from `start_time` to `end_time` of the old trace.
///
/// `(1, 0)` reverses the trace. `(0, k)` scales its length by `k` keeping the
/// start. Distance and time are recomputed against the new trace.
pub fn slide_trace_by_time(hit: &mut HitEvent, start_time: f32, end_time: f32) {
    let multiplier = end_time - start_time;
    if multiplier == 0.0 {
        log::error!("Cannot slide trace onto an empty time span ({start_time}, {end_time})");
        return;
    }

    let length = trace_length(hit);
    let direction = safe_normal(&(hit.trace_end - hit.trace_start));
    let new_start = hit.trace_start + direction * (start_time * length);
    let new_end = hit.trace_end - direction * ((1.0 - end_time) * length);

    hit.trace_start = new_start;
    hit.trace_end = new_end;
    hit.time = (hit.time - start_time) / multiplier;
    hit.distance = (length * multiplier).abs() * hit.time;

    if hit.time < -TIME_TOLERANCE || hit.time > 1.0 + TIME_TOLERANCE {
        log::error!(
            "Remapped hit time {} is outside [0, 1] after sliding by ({start_time}, {end_time})",
            hit.time
        );
        debug_assert!(false, "remapped hit time {} out of range", hit.time);
    }
}
