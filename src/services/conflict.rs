//! Pairwise double-booking detection.

use tracing::debug;

use crate::models::schedule::{ConflictReport, ScheduleDraft};
use crate::services::schedule_utils;

/// Report every event in `events` that collides with `target`.
///
/// Two events collide when their intervals strictly overlap and they compete
/// for the same resource label or the same executor. The target itself is
/// skipped when it appears in the collection under the same identifier. Pure
/// and total: no collisions is an empty list, never an error.
pub fn check_conflicts(events: &[ScheduleDraft], target: &ScheduleDraft) -> Vec<ConflictReport> {
    let mut conflicts = Vec::new();

    for event in events {
        if let (Some(event_id), Some(target_id)) = (&event.id, &target.id) {
            if event_id == target_id {
                continue;
            }
        }

        if collides(target, event) {
            conflicts.push(ConflictReport {
                content: event.content.clone(),
                start_at: event.start_at,
                end_at: event.end_at,
                resource: event.resource.clone(),
                executor: event.executor.clone(),
            });
        }
    }

    if !conflicts.is_empty() {
        debug!(count = conflicts.len(), "schedule conflicts detected");
    }
    conflicts
}

/// Collision predicate shared by the detector and the fitness evaluator.
pub fn collides(a: &ScheduleDraft, b: &ScheduleDraft) -> bool {
    schedule_utils::overlaps(a.start_at, a.end_at, b.start_at, b.end_at)
        && (a.resource == b.resource || a.executor == b.executor)
}
