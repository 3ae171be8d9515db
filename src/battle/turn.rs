//! Turn order and the action-point economy
//!
//! A fixed round-robin over every unit in the battle. Incapacitated units
//! are skipped in place rather than removed, so initiative order is stable
//! for the whole fight. A unit gets its action points back the moment its
//! turn starts.

use serde::{Deserialize, Serialize};

use crate::core::types::UnitId;
use crate::entities::unit::{Team, UnitRoster};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnQueue {
    order: Vec<UnitId>,
    /// Index of the unit whose turn it is; meaningless until `started`
    cursor: usize,
    started: bool,
    /// Completed cycles through the order: 0 for the whole first round
    pub round: u32,
}

impl TurnQueue {
    /// Initiative order is the order given and never changes
    pub fn new(order: Vec<UnitId>) -> Self {
        Self { order, cursor: 0, started: false, round: 0 }
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        if !self.started {
            return None;
        }
        self.order.get(self.cursor).copied()
    }

    /// Advance to the next unit able to act, refreshing its action points.
    /// Returns None once every unit in the queue is incapacitated.
    pub fn next_turn(&mut self, units: &mut UnitRoster) -> Option<UnitId> {
        if self.order.is_empty() {
            return None;
        }

        for _ in 0..self.order.len() {
            if !self.started {
                self.started = true;
            } else {
                self.cursor += 1;
                if self.cursor >= self.order.len() {
                    self.cursor = 0;
                    self.round += 1;
                    tracing::debug!(round = self.round, "new round");
                }
            }

            let id = self.order[self.cursor];
            if let Some(unit) = units.get_mut(id) {
                if unit.can_act() {
                    unit.reset_turn();
                    return Some(id);
                }
            }
        }

        None
    }

    /// True when one side has no standing units left
    pub fn battle_over(units: &UnitRoster) -> bool {
        units.active_on_team(Team::Player).next().is_none()
            || units.active_on_team(Team::Enemy).next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::unit::Unit;

    fn setup() -> (UnitRoster, TurnQueue) {
        let mut units = UnitRoster::new();
        let a = units.add(Unit::cultist("A"));
        let b = units.add(Unit::cultist("B"));
        let c = units.add(Unit::hound("C"));
        (units, TurnQueue::new(vec![a, b, c]))
    }

    #[test]
    fn test_round_robin_order() {
        let (mut units, mut queue) = setup();
        assert_eq!(queue.current_unit(), None);

        let first = queue.next_turn(&mut units).unwrap();
        let second = queue.next_turn(&mut units).unwrap();
        let third = queue.next_turn(&mut units).unwrap();
        assert_ne!(first, second);
        assert_ne!(second, third);
        // The whole first cycle is round 0; serving the first unit is not
        // a completed round
        assert_eq!(queue.round, 0);

        // Wraps back to the first unit and counts the round
        let fourth = queue.next_turn(&mut units).unwrap();
        assert_eq!(fourth, first);
        assert_eq!(queue.round, 1);

        // Second wrap, second completed round
        queue.next_turn(&mut units);
        queue.next_turn(&mut units);
        queue.next_turn(&mut units);
        assert_eq!(queue.round, 2);
    }

    #[test]
    fn test_turn_start_refreshes_action_points() {
        let (mut units, mut queue) = setup();
        let id = queue.next_turn(&mut units).unwrap();
        units.get_mut(id).unwrap().action_points = 0;

        queue.next_turn(&mut units);
        queue.next_turn(&mut units);
        let again = queue.next_turn(&mut units).unwrap();
        assert_eq!(again, id);
        assert!(units.get(id).unwrap().has_actions_remaining());
    }

    #[test]
    fn test_incapacitated_units_skipped() {
        let (mut units, mut queue) = setup();
        let first = queue.next_turn(&mut units).unwrap();
        let second = queue.next_turn(&mut units).unwrap();
        units.get_mut(second).unwrap().take_damage(100);

        queue.next_turn(&mut units); // third unit
        let next = queue.next_turn(&mut units).unwrap();
        // Skips the downed second unit, back to the first
        assert_eq!(next, first);
    }

    #[test]
    fn test_all_down_ends_queue() {
        let (mut units, mut queue) = setup();
        for unit in units.iter_mut() {
            unit.take_damage(100);
        }
        assert_eq!(queue.next_turn(&mut units), None);
    }

    #[test]
    fn test_battle_over_detection() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut units = UnitRoster::new();
        let mut r = StdRng::seed_from_u64(5);
        let inv = units.add(Unit::investigator("Inv", &mut r));
        let cultist = units.add(Unit::cultist("Cultist"));

        assert!(!TurnQueue::battle_over(&units));
        units.get_mut(cultist).unwrap().take_damage(100);
        assert!(TurnQueue::battle_over(&units));

        let _ = inv;
    }
}
