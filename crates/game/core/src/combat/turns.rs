//! Turn order computation.

use crate::state::EntityId;

use super::Combatant;

/// Orders participants by descending speed.
///
/// The sort is stable, so ties keep insertion order (player first, then
/// opponents in trigger order).
pub fn compute_turn_order(participants: &[Combatant]) -> Vec<EntityId> {
    let mut order: Vec<&Combatant> = participants.iter().collect();
    order.sort_by(|a, b| b.speed.cmp(&a.speed));
    order.into_iter().map(|c| c.id).collect()
}

/// Finds the next living participant after `current` in `order`.
///
/// Returns the new index and whether the search wrapped past the end of the
/// order (a new round). `None` if nobody is alive.
pub fn next_living(
    order: &[EntityId],
    current: usize,
    participants: &[Combatant],
) -> Option<(usize, bool)> {
    let len = order.len();
    (1..=len).find_map(|step| {
        let index = (current + step) % len;
        let alive = participants
            .iter()
            .any(|c| c.id == order[index] && c.is_alive());
        alive.then_some((index, current + step >= len))
    })
}
